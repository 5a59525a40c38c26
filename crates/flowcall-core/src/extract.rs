//! Tool-call extraction from a completion response
//!
//! Arguments that do not parse become `{}` plus a warning, never an error.
//! Dispatch is stricter, see `ToolDispatcher::process_tool_calls`.

use serde_json::Value;

use crate::logging::Logger;
use crate::types::{empty_args, ChoiceMessage, ProcessedToolCall, ResponseToolCall};

/// Structure the tool calls requested by a response message
///
/// Returns `None` when the message requests no tool calls. Every returned
/// record has an empty `result`.
pub fn extract_tool_calls(
    message: &ChoiceMessage,
    logger: &dyn Logger,
) -> Option<Vec<ProcessedToolCall>> {
    let calls = message.tool_calls();
    if calls.is_empty() {
        return None;
    }

    Some(
        calls
            .iter()
            .map(|call| ProcessedToolCall::new(&call.id, &call.function.name, parse_args(call, logger), ""))
            .collect(),
    )
}

fn parse_args(call: &ResponseToolCall, logger: &dyn Logger) -> Value {
    match &call.function.arguments {
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(args) => args,
            Err(e) => {
                logger.warn(&format!(
                    "[ToolCallExtractor] Failed to parse arguments of tool call {} ({}): {}",
                    call.id, call.function.name, e
                ));
                empty_args()
            }
        },
        Value::Null => empty_args(),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemoryLogger;
    use serde_json::json;

    fn message(tool_calls: Value) -> ChoiceMessage {
        serde_json::from_value(json!({ "role": "assistant", "content": "", "tool_calls": tool_calls }))
            .unwrap()
    }

    #[test]
    fn test_no_tool_calls() {
        let logger = MemoryLogger::new();
        assert!(extract_tool_calls(&message(Value::Null), &logger).is_none());
        assert!(extract_tool_calls(&message(json!([])), &logger).is_none());
    }

    #[test]
    fn test_extracts_in_order() {
        let logger = MemoryLogger::new();
        let calls = extract_tool_calls(
            &message(json!([
                { "id": "c1", "type": "function", "function": { "name": "_-_-_search_-_-_lookup", "arguments": "{\"q\":\"x\"}" } },
                { "id": "c2", "type": "function", "function": { "name": "handoff_to_billing", "arguments": { "x": 1 } } }
            ])),
            &logger,
        )
        .unwrap();

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].id, "c1");
        assert_eq!(calls[0].args, json!({ "q": "x" }));
        assert_eq!(calls[0].result, "");
        assert_eq!(calls[1].args, json!({ "x": 1 }));
        assert!(logger.warnings().is_empty());
    }

    #[test]
    fn test_bad_arguments_degrade_to_empty() {
        let logger = MemoryLogger::new();
        let calls = extract_tool_calls(
            &message(json!([
                { "id": "c1", "function": { "name": "lookup", "arguments": "{not json" } }
            ])),
            &logger,
        )
        .unwrap();

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args, json!({}));
        assert_eq!(logger.warnings().len(), 1);
        assert!(logger.warnings()[0].contains("c1"));
    }
}
