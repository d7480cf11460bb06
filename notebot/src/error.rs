use crate::ai::AiError;
use thiserror::Error;

/// Errors surfaced by a conversation turn or the line loop
#[derive(Debug, Error)]
pub enum AgentError {
    /// The completion endpoint failed; fatal for the run
    #[error("completion failed: {0}")]
    Ai(#[from] AiError),
    /// The reply had no `\MESSAGE` block; the turn is lost but the run goes on
    #[error("reply contained no \\MESSAGE directive")]
    NoReply,
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl AgentError {
    /// Whether the line loop can carry on to the next user input
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AgentError::NoReply)
    }
}
