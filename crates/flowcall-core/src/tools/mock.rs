//! Mock tool service for testing
//!
//! Answers from a table keyed by `(server, tool)` and records every call,
//! so tests can assert both what came back and what was (or was not) sent.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use super::service::{ToolCallOutcome, ToolService, ToolServiceError};

/// Canned answer for one tool
#[derive(Debug, Clone)]
pub enum MockToolResponse {
    /// Report this outcome
    Outcome(ToolCallOutcome),
    /// Fail without an outcome
    Error(ToolServiceError),
}

/// A call the mock received
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedToolCall {
    pub server: String,
    pub tool: String,
    pub args: Value,
}

/// Deterministic `ToolService`
pub struct MockToolService {
    responses: HashMap<(String, String), MockToolResponse>,
    fallback: MockToolResponse,
    calls: Mutex<Vec<RecordedToolCall>>,
}

impl MockToolService {
    /// Unknown tools succeed with `null` data
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            fallback: MockToolResponse::Outcome(ToolCallOutcome::ok(Value::Null)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_outcome(
        mut self,
        server: impl Into<String>,
        tool: impl Into<String>,
        outcome: ToolCallOutcome,
    ) -> Self {
        self.responses
            .insert((server.into(), tool.into()), MockToolResponse::Outcome(outcome));
        self
    }

    pub fn with_error(
        mut self,
        server: impl Into<String>,
        tool: impl Into<String>,
        error: ToolServiceError,
    ) -> Self {
        self.responses
            .insert((server.into(), tool.into()), MockToolResponse::Error(error));
        self
    }

    /// Answer for tools not in the table
    pub fn with_fallback(mut self, response: MockToolResponse) -> Self {
        self.fallback = response;
        self
    }

    pub fn calls(&self) -> Vec<RecordedToolCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Default for MockToolService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolService for MockToolService {
    async fn call_tool(
        &self,
        server: &str,
        tool: &str,
        args: Value,
    ) -> Result<ToolCallOutcome, ToolServiceError> {
        self.calls.lock().push(RecordedToolCall {
            server: server.to_string(),
            tool: tool.to_string(),
            args,
        });

        let response = self
            .responses
            .get(&(server.to_string(), tool.to_string()))
            .unwrap_or(&self.fallback);

        match response {
            MockToolResponse::Outcome(outcome) => Ok(outcome.clone()),
            MockToolResponse::Error(error) => Err(error.clone()),
        }
    }
}
