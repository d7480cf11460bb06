use super::conversation::Conversation;
use super::turn::Agent;
use crate::error::AgentError;
use std::io::{BufRead, Write};

/// Typing this on its own line ends the session
pub const QUIT_COMMAND: &str = "quit";
/// Shown when a reply came back without a `\MESSAGE` block
pub const NO_REPLY_FALLBACK: &str = "(no reply)";

/// Interactive line loop: prompt, run a turn, print the reply. Returns on
/// `quit` or end of input; fatal turn errors are propagated.
pub async fn run_repl<R: BufRead, W: Write>(
    agent: &Agent,
    conversation: &mut Conversation,
    mut input: R,
    mut output: W,
) -> Result<(), AgentError> {
    log::info!(
        "[AGENT] Starting session with {} note(s) in {:?}",
        agent.store().list_notes().len(),
        agent.store().notes_dir()
    );

    loop {
        write!(output, "User: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            log::info!("[AGENT] End of input, exiting");
            break;
        }
        let user_input = line.trim_end_matches(['\n', '\r']);
        if user_input == QUIT_COMMAND {
            break;
        }

        match agent.run_turn(conversation, user_input).await {
            Ok(reply) => {
                log::debug!(
                    "[AGENT] Turn read {:?}, wrote {:?}",
                    reply.notes_read,
                    reply.notes_written
                );
                writeln!(output, "Assistant: {}", reply.message)?;
            }
            Err(e) if e.is_recoverable() => {
                log::warn!("[AGENT] Turn produced no reply: {}", e);
                writeln!(output, "Assistant: {}", NO_REPLY_FALLBACK)?;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
