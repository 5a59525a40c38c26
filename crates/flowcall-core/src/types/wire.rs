//! Chat-completion wire shapes
//!
//! Requests are built from typed structs. Responses are decoded into typed
//! structs with every field optional, so a provider that leaves something
//! out (or sends `null`) is caught when the response is validated instead
//! of somewhere deep in the pipeline.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::message::{ConversationMessage, MessageRole, RequestedToolCall};
use super::tool::ToolSchema;

/// Function part of a tool call on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireFunctionCall {
    pub name: String,
    pub arguments: String,
}

/// Tool call as the completion API expects it in request messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub function: WireFunctionCall,
}

impl From<&RequestedToolCall> for WireToolCall {
    fn from(call: &RequestedToolCall) -> Self {
        Self {
            id: call.id.clone(),
            kind: "function".to_string(),
            function: WireFunctionCall {
                name: call.name.clone(),
                arguments: call.arguments.clone(),
            },
        }
    }
}

/// A transcript message as sent to the endpoint
///
/// Same fields as `ConversationMessage` minus `timestamp`, which providers
/// reject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub role: MessageRole,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(rename = "processNodeId", skip_serializing_if = "Option::is_none")]
    pub process_node_id: Option<String>,
}

impl WireMessage {
    /// System message that exists only on the wire
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            id: None,
            role: MessageRole::System,
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
            process_node_id: None,
        }
    }
}

impl From<&ConversationMessage> for WireMessage {
    fn from(msg: &ConversationMessage) -> Self {
        Self {
            id: Some(msg.id.clone()),
            role: msg.role,
            content: msg.content.clone(),
            tool_calls: msg
                .tool_calls
                .as_ref()
                .map(|calls| calls.iter().map(WireToolCall::from).collect()),
            tool_call_id: msg.tool_call_id.clone(),
            process_node_id: msg.process_node_id.clone(),
        }
    }
}

/// Request body for `POST /chat/completions`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolSchema>>,
}

/// Error object a provider embeds in a response body
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EmbeddedError {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub param: Option<Value>,
    /// Provider extras; routers put the upstream body in `metadata.raw`
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl EmbeddedError {
    /// `code` rendered as text whether the provider sent a number or a string
    pub fn code_text(&self) -> Option<String> {
        self.code.as_ref().and_then(value_text)
    }

    pub fn param_text(&self) -> Option<String> {
        self.param.as_ref().and_then(value_text)
    }

    /// Upstream error body forwarded by a router, when present
    pub fn raw_payload(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("raw"))
            .and_then(Value::as_str)
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Explicit `null` decodes like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Function part of a tool call in a response
///
/// `arguments` is normally a JSON string but some OpenAI-compatible servers
/// send the object itself.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResponseFunctionCall {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Tool call in a response message
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResponseToolCall {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub function: ResponseFunctionCall,
}

impl ResponseToolCall {
    /// Raw argument text, re-serializing object arguments
    pub fn arguments_text(&self) -> String {
        match &self.function.arguments {
            Value::String(s) => s.clone(),
            Value::Null => "{}".to_string(),
            other => other.to_string(),
        }
    }

    pub fn to_requested(&self) -> RequestedToolCall {
        RequestedToolCall::new(&self.id, &self.function.name, self.arguments_text())
    }
}

/// Message of a response choice
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ResponseToolCall>>,
}

impl ChoiceMessage {
    /// Assistant text; multi-part content is flattened, anything else is `""`
    pub fn text(&self) -> String {
        match &self.content {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Array(parts)) => parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join(""),
            _ => String::new(),
        }
    }

    /// Requested tool calls, empty when the message carries none
    pub fn tool_calls(&self) -> &[ResponseToolCall] {
        self.tool_calls.as_deref().unwrap_or(&[])
    }
}

/// One choice of a response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Typed view of a chat-completion response body
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Option<Vec<Choice>>,
    #[serde(default)]
    pub error: Option<EmbeddedError>,
}

impl ChatCompletionResponse {
    /// Message of the first choice, if the response has one
    pub fn first_message(&self) -> Option<&ChoiceMessage> {
        self.choices
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.message.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transcript_message() -> ConversationMessage {
        ConversationMessage {
            id: "m1".to_string(),
            role: MessageRole::Assistant,
            content: "calling".to_string(),
            tool_calls: Some(vec![RequestedToolCall::new("c1", "lookup", "{\"q\":\"x\"}")]),
            tool_call_id: None,
            timestamp: 42,
            process_node_id: Some("n1".to_string()),
        }
    }

    #[test]
    fn test_wire_message_has_no_timestamp() {
        let wire = WireMessage::from(&transcript_message());
        let json = serde_json::to_value(&wire).unwrap();

        assert!(json.get("timestamp").is_none());
        assert_eq!(json["id"], "m1");
        assert_eq!(json["processNodeId"], "n1");
        assert_eq!(json["tool_calls"][0]["type"], "function");
        assert_eq!(json["tool_calls"][0]["function"]["arguments"], "{\"q\":\"x\"}");
    }

    #[test]
    fn test_request_omits_tools_when_absent() {
        let request = ChatCompletionRequest {
            model: "gpt-4o".to_string(),
            messages: vec![WireMessage::system("be brief")],
            temperature: 0.0,
            tools: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("tools").is_none());
        assert!(json["messages"][0].get("id").is_none());
    }

    #[test]
    fn test_response_tolerates_nulls() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": null, "tool_calls": null },
                "finish_reason": "stop"
            }]
        }))
        .unwrap();

        let message = response.first_message().unwrap();
        assert_eq!(message.text(), "");
        assert!(message.tool_calls().is_empty());
    }

    #[test]
    fn test_tool_call_tolerates_null_id_and_name() {
        let message: ChoiceMessage = serde_json::from_value(json!({
            "role": "assistant",
            "tool_calls": [
                { "id": null, "type": "function", "function": { "name": null, "arguments": "{}" } },
                { "id": "c2", "function": null }
            ]
        }))
        .unwrap();

        let calls = message.tool_calls();
        assert_eq!(calls.len(), 2);
        let first = calls[0].to_requested();
        assert_eq!(first.id, "");
        assert_eq!(first.name, "");
        assert_eq!(first.arguments, "{}");
        assert_eq!(calls[1].to_requested().name, "");
        assert_eq!(calls[1].arguments_text(), "{}");
    }

    #[test]
    fn test_response_without_choices() {
        let response: ChatCompletionResponse =
            serde_json::from_value(json!({ "choices": null })).unwrap();
        assert!(response.first_message().is_none());

        let empty: ChatCompletionResponse = serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert!(empty.first_message().is_none());
    }

    #[test]
    fn test_multipart_content_is_flattened() {
        let message: ChoiceMessage = serde_json::from_value(json!({
            "content": [{ "type": "text", "text": "Hello, " }, { "type": "text", "text": "world" }]
        }))
        .unwrap();
        assert_eq!(message.text(), "Hello, world");
    }

    #[test]
    fn test_object_arguments_are_reserialized() {
        let call: ResponseToolCall = serde_json::from_value(json!({
            "id": "c9",
            "function": { "name": "lookup", "arguments": { "q": "x" } }
        }))
        .unwrap();
        assert_eq!(call.to_requested().arguments, "{\"q\":\"x\"}");
    }

    #[test]
    fn test_embedded_error_fields() {
        let error: EmbeddedError = serde_json::from_value(json!({
            "message": "Provider returned error",
            "code": 400,
            "metadata": { "raw": "{\"error\":{\"message\":\"bad image\"}}" }
        }))
        .unwrap();
        assert_eq!(error.code_text().as_deref(), Some("400"));
        assert!(error.param_text().is_none());
        assert!(error.raw_payload().unwrap().contains("bad image"));
    }
}
