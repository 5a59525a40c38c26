//! Transcript assembly
//!
//! Transcripts are append-only. Nothing here edits a message in place;
//! `appended` returns a new vector and leaves its input alone.

use std::collections::HashSet;

use thiserror::Error;
use uuid::Uuid;

use crate::types::{ConversationMessage, MessageRole, RequestedToolCall};

/// Fresh message id (UUID v4)
pub fn new_message_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time as UTC epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl ConversationMessage {
    fn fresh(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: new_message_id(),
            role,
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
            timestamp: now_millis(),
            process_node_id: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::fresh(MessageRole::User, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::fresh(MessageRole::System, content)
    }

    /// Assistant message; an empty `tool_calls` list is stored as `None`
    pub fn assistant(content: impl Into<String>, tool_calls: Vec<RequestedToolCall>) -> Self {
        let mut msg = Self::fresh(MessageRole::Assistant, content);
        if !tool_calls.is_empty() {
            msg.tool_calls = Some(tool_calls);
        }
        msg
    }

    /// Tool-role message answering the call `tool_call_id`
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        let mut msg = Self::fresh(MessageRole::Tool, content);
        msg.tool_call_id = Some(tool_call_id.into());
        msg
    }

    pub fn with_process_node_id(mut self, process_node_id: Option<String>) -> Self {
        self.process_node_id = process_node_id;
        self
    }
}

/// Copy of `transcript` with `extra` appended
pub fn appended(
    transcript: &[ConversationMessage],
    extra: impl IntoIterator<Item = ConversationMessage>,
) -> Vec<ConversationMessage> {
    let mut out = transcript.to_vec();
    out.extend(extra);
    out
}

/// Broken link between a tool result and the call it answers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("tool message {message_id} at index {index} has no tool_call_id")]
    MissingToolCallId { index: usize, message_id: String },

    #[error("tool message {message_id} at index {index} answers unknown tool call {tool_call_id}")]
    UnknownToolCall {
        index: usize,
        message_id: String,
        tool_call_id: String,
    },
}

/// Check that every tool-role message answers a call requested by an
/// earlier assistant message
///
/// Reports the first offending message.
pub fn validate_tool_links(transcript: &[ConversationMessage]) -> Result<(), TranscriptError> {
    let mut requested: HashSet<&str> = HashSet::new();

    for (index, msg) in transcript.iter().enumerate() {
        match msg.role {
            MessageRole::Assistant => {
                requested.extend(msg.requested_tool_calls().iter().map(|c| c.id.as_str()));
            }
            MessageRole::Tool => {
                let tool_call_id =
                    msg.tool_call_id
                        .as_deref()
                        .ok_or_else(|| TranscriptError::MissingToolCallId {
                            index,
                            message_id: msg.id.clone(),
                        })?;
                if !requested.contains(tool_call_id) {
                    return Err(TranscriptError::UnknownToolCall {
                        index,
                        message_id: msg.id.clone(),
                        tool_call_id: tool_call_id.to_string(),
                    });
                }
            }
            MessageRole::User | MessageRole::System => {}
        }
    }

    Ok(())
}
