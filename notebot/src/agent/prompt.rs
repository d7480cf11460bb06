use crate::notes::PathRule;

const INSTRUCTIONS: &str = "You are a helpful assistant, but your memory does not work. Every time the user \
     sends you a message you will have forgotten everything either of you said before. \
     What you can do is keep notes.\n\n\
     The user's input starts with a line containing only '\\MESSAGE'.\n\n\
     Your output must be a series of '\\READ' lines, then a '\\MESSAGE' line followed by \
     one or more lines with your reply, then a series of '\\WRITE' blocks.\n\n\
     ## Commands\n\
     \\READ <path> - Print the contents of the note at <path>.\n\
     \\MESSAGE - Write your reply to the user's message on the following lines.\n\
     \\WRITE <path> - Append the following lines to the note at <path>.\n\n";

/// Build the system prompt, embedding the current note tree
pub fn build_system_prompt(notes_tree: &str, rule: PathRule) -> String {
    let path_hint = match rule {
        PathRule::Legacy => "may contain '/' but never '.'",
        PathRule::Strict => "may contain '/' but no '.' or '..' segments",
    };
    let tree = if notes_tree.is_empty() {
        "(no notes yet)\n"
    } else {
        notes_tree
    };

    format!(
        "{INSTRUCTIONS}Note paths are relative to your notes directory and {path_hint}.\n\
         Save anything that might be useful later in your notes.\n\n\
         ## Your notes directory\n\n{tree}"
    )
}
