//! Conversation transcript types

use serde::{Deserialize, Serialize};

/// Role of a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::Tool => write!(f, "tool"),
        }
    }
}

/// A tool invocation requested by the model
///
/// `arguments` is kept exactly as the completion endpoint sent it: a JSON
/// document serialized to a string. Nothing here guarantees it parses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedToolCall {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

impl RequestedToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// One entry of a conversation transcript
///
/// Messages are never edited after they are appended. `tool_call_id` is
/// only set on tool-role messages and names the `RequestedToolCall` the
/// message answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<RequestedToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Epoch milliseconds
    pub timestamp: i64,
    #[serde(rename = "processNodeId", default, skip_serializing_if = "Option::is_none")]
    pub process_node_id: Option<String>,
}

impl ConversationMessage {
    /// Requested tool calls, empty when the message carries none
    pub fn requested_tool_calls(&self) -> &[RequestedToolCall] {
        self.tool_calls.as_deref().unwrap_or(&[])
    }

    pub fn is_tool_result(&self) -> bool {
        self.role == MessageRole::Tool
    }
}
