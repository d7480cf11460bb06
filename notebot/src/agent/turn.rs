use super::conversation::Conversation;
use super::prompt::build_system_prompt;
use crate::ai::CompletionClient;
use crate::directives::{self, Marker, parse_directives};
use crate::error::AgentError;
use crate::notes::{NoteStore, NoteWrite};
use std::sync::Arc;

/// What a completed turn produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReply {
    /// Trimmed text of the first `\MESSAGE` block
    pub message: String,
    /// Note paths the model asked to read before replying
    pub notes_read: Vec<String>,
    /// Note paths that were appended to
    pub notes_written: Vec<String>,
}

/// Runs turns against a note store and a completion client
pub struct Agent {
    store: NoteStore,
    client: Arc<dyn CompletionClient>,
}

impl Agent {
    pub fn new(store: NoteStore, client: Arc<dyn CompletionClient>) -> Self {
        Self { store, client }
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    /// Run one turn for `user_input`.
    ///
    /// Two completions are requested: the first is cut off at `\MESSAGE` and
    /// only its `\READ` lines are used; the requested notes are then injected
    /// as an assistant message and the second completion produces the reply
    /// and any `\WRITE` blocks. Writes are applied before the reply is checked,
    /// so a reply without `\MESSAGE` still persists its notes.
    pub async fn run_turn(
        &self,
        conversation: &mut Conversation,
        user_input: &str,
    ) -> Result<TurnReply, AgentError> {
        conversation.push_user(user_input);
        let system_prompt = build_system_prompt(&self.store.render_tree(), self.store.path_rule());

        // Read phase
        let stop = vec![Marker::Message.as_ref().to_string()];
        let read_phase = self
            .client
            .complete(&conversation.with_system(&system_prompt), Some(stop.as_slice()))
            .await?;
        let notes_read = directives::read_requests(&parse_directives(&read_phase.content));
        log::info!("[AGENT] Read phase requested {} note(s)", notes_read.len());

        let context = self.inject_notes(&notes_read);
        conversation.push_assistant(context);

        // Reply phase
        let reply = self
            .client
            .complete(&conversation.with_system(&system_prompt), None)
            .await?;
        let directive_map = parse_directives(&reply.content);
        conversation.push(reply);

        let mut notes_written = Vec::new();
        for write in directives::write_requests(&directive_map) {
            match self.store.append(&write.path, &write.content) {
                NoteWrite::Appended { bytes } => {
                    log::debug!("[AGENT] Appended {} byte(s) to {:?}", bytes, write.path);
                    notes_written.push(write.path);
                }
                NoteWrite::InvalidPath => {}
                NoteWrite::Failed(reason) => {
                    log::warn!("[AGENT] Failed to write note {:?}: {}", write.path, reason);
                }
            }
        }

        let message = directives::reply(&directive_map).ok_or_else(|| {
            log::warn!(
                "[AGENT] Reply had no \\MESSAGE directive ({} note(s) written)",
                notes_written.len()
            );
            AgentError::NoReply
        })?;

        log::debug!(
            "[AGENT] Turn complete: history={} read={:?} written={:?}",
            conversation.len(),
            notes_read,
            notes_written
        );

        Ok(TurnReply {
            message,
            notes_read,
            notes_written,
        })
    }

    /// Build the synthetic assistant message holding the requested notes:
    /// `\READ <path>` followed by the note text, for every request.
    fn inject_notes(&self, paths: &[String]) -> String {
        let mut context = String::new();
        for path in paths {
            let note = self.store.read(path);
            context.push_str(Marker::Read.as_ref());
            context.push(' ');
            context.push_str(path);
            context.push('\n');
            context.push_str(note.render());
            context.push('\n');
        }
        context
    }
}
