//! Mock completion client for testing
//!
//! Returns a configured body (or error) without network access and keeps
//! every request it was handed.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use super::client::{CompletionClient, CompletionEndpoint, CompletionError};
use crate::types::ChatCompletionRequest;

/// Mock response mode
#[derive(Debug, Clone)]
pub enum MockCompletionMode {
    /// Return this body every time
    Fixed(Value),
    /// Return these results in order; the last one repeats
    Sequence(Vec<Result<Value, CompletionError>>),
    /// Fail every time
    Error(CompletionError),
}

/// Deterministic `CompletionClient`
pub struct MockCompletionClient {
    mode: MockCompletionMode,
    queue: Mutex<VecDeque<Result<Value, CompletionError>>>,
    requests: Mutex<Vec<(CompletionEndpoint, ChatCompletionRequest)>>,
}

impl MockCompletionClient {
    pub fn new(mode: MockCompletionMode) -> Self {
        let queue = match &mode {
            MockCompletionMode::Sequence(items) => items.iter().cloned().collect(),
            _ => VecDeque::new(),
        };
        Self {
            mode,
            queue: Mutex::new(queue),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `body`
    pub fn fixed(body: Value) -> Self {
        Self::new(MockCompletionMode::Fixed(body))
    }

    /// Answer with a plain assistant message
    pub fn text(content: impl Into<String>) -> Self {
        Self::fixed(chat_response(json!({ "role": "assistant", "content": content.into() })))
    }

    pub fn error(error: CompletionError) -> Self {
        Self::new(MockCompletionMode::Error(error))
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<(CompletionEndpoint, ChatCompletionRequest)> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Most recent request body
    pub fn last_request(&self) -> Option<ChatCompletionRequest> {
        self.requests.lock().last().map(|(_, r)| r.clone())
    }
}

/// Wrap a message in a single-choice completion body
pub fn chat_response(message: Value) -> Value {
    json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "model": "mock",
        "choices": [{ "index": 0, "message": message, "finish_reason": "stop" }]
    })
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn create(
        &self,
        endpoint: &CompletionEndpoint,
        request: &ChatCompletionRequest,
    ) -> Result<Value, CompletionError> {
        self.requests.lock().push((endpoint.clone(), request.clone()));

        match &self.mode {
            MockCompletionMode::Fixed(body) => Ok(body.clone()),
            MockCompletionMode::Error(error) => Err(error.clone()),
            MockCompletionMode::Sequence(items) => {
                let mut queue = self.queue.lock();
                if queue.len() > 1 {
                    queue.pop_front().unwrap_or_else(|| Err(CompletionError::api("mock exhausted")))
                } else {
                    queue
                        .front()
                        .or_else(|| items.last())
                        .cloned()
                        .unwrap_or_else(|| Err(CompletionError::api("mock exhausted")))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WireMessage;

    fn request() -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: "mock".to_string(),
            messages: vec![WireMessage::system("hi")],
            temperature: 0.0,
            tools: None,
        }
    }

    #[tokio::test]
    async fn test_sequence_repeats_last() {
        let client = MockCompletionClient::new(MockCompletionMode::Sequence(vec![
            Ok(json!({ "n": 1 })),
            Err(CompletionError::api("boom")),
        ]));
        let endpoint = CompletionEndpoint::new(None, "k");

        assert_eq!(client.create(&endpoint, &request()).await, Ok(json!({ "n": 1 })));
        assert!(client.create(&endpoint, &request()).await.is_err());
        assert!(client.create(&endpoint, &request()).await.is_err());
        assert_eq!(client.request_count(), 3);
    }
}
