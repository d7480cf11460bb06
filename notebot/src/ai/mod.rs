//! Completion client abstraction
//!
//! The agent only needs one capability from a model: given an ordered list of
//! role-tagged messages (and optional stop sequences), return the next
//! assistant message.

pub mod openai;

#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use openai::OpenAiClient;

#[cfg(test)]
pub use mock::MockAiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<AiError> },
}

impl AiError {
    /// Whether a retry has a reasonable chance of succeeding
    pub fn is_transient(&self) -> bool {
        match self {
            AiError::Transport(e) => e.is_timeout() || e.is_connect(),
            AiError::Http { status, .. } => *status == 429 || *status >= 500,
            AiError::MalformedResponse(_) | AiError::RetriesExhausted { .. } => false,
        }
    }
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate the next assistant message. Generation stops before the first
    /// occurrence of any `stop` sequence.
    async fn complete(
        &self,
        messages: &[Message],
        stop: Option<&[String]>,
    ) -> Result<Message, AiError>;
}
