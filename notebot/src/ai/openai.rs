//! Client for OpenAI-compatible chat completion endpoints.

use super::{AiError, CompletionClient, Message, MessageRole};
use crate::config::AiConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    model: String,
    max_retries: u32,
    initial_backoff: Duration,
    client: reqwest::Client,
}

// ── Wire types ──────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    role: Option<MessageRole>,
    #[serde(default)]
    content: Option<String>,
}

// ── Client impl ─────────────────────────────────────

impl OpenAiClient {
    pub fn new(config: &AiConfig) -> Result<Self, AiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_retries: config.max_retries,
            initial_backoff: INITIAL_BACKOFF,
            client,
        })
    }

    /// Override the first retry delay (doubles on every further retry)
    #[cfg(test)]
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    async fn send_once(
        &self,
        messages: &[Message],
        stop: Option<&[String]>,
    ) -> Result<Message, AiError> {
        let body = ChatRequest {
            model: &self.model,
            messages,
            stop,
        };

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| AiError::MalformedResponse(e.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AiError::MalformedResponse("response has no choices".to_string()))?;

        if let Some(role) = choice.message.role {
            if role != MessageRole::Assistant {
                log::warn!("[AI] Completion returned role {:?}, treating as assistant", role);
            }
        }

        Ok(Message::assistant(choice.message.content.unwrap_or_default()))
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        messages: &[Message],
        stop: Option<&[String]>,
    ) -> Result<Message, AiError> {
        let mut backoff = self.initial_backoff;
        let mut attempt = 0;

        loop {
            attempt += 1;
            log::debug!(
                "[AI] Requesting completion from {} (model={}, messages={}, attempt={})",
                self.base_url,
                self.model,
                messages.len(),
                attempt
            );

            match self.send_once(messages, stop).await {
                Ok(message) => return Ok(message),
                Err(e) if e.is_transient() && attempt <= self.max_retries => {
                    log::warn!(
                        "[AI] Completion attempt {} failed: {}. Retrying in {:?}",
                        attempt,
                        e,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
                Err(e) if e.is_transient() && attempt > 1 => {
                    return Err(AiError::RetriesExhausted {
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }
}
