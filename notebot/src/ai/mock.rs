//! Scripted completion client for tests.

use super::{AiError, CompletionClient, Message};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A request the mock received
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub messages: Vec<Message>,
    pub stop: Option<Vec<String>>,
}

/// Replays pre-configured responses in order and records every request.
pub struct MockAiClient {
    responses: Mutex<VecDeque<Result<String, AiError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockAiClient {
    pub fn new(responses: Vec<Result<String, AiError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for MockAiClient {
    async fn complete(
        &self,
        messages: &[Message],
        stop: Option<&[String]>,
    ) -> Result<Message, AiError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            messages: messages.to_vec(),
            stop: stop.map(|s| s.to_vec()),
        });

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(text)) => Ok(Message::assistant(text)),
            Some(Err(e)) => Err(e),
            None => Err(AiError::MalformedResponse(
                "mock has no scripted responses left".to_string(),
            )),
        }
    }
}
