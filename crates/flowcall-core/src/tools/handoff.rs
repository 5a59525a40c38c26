//! Handoff pseudo-tool

use serde::Serialize;
use serde_json::{json, Value};

use super::name::{HANDOFF_PREFIX, HANDOFF_TOOL};
use crate::types::ToolSchema;

/// Result body of a handoff call: `{"handoff":true,"args":...}`
#[derive(Debug, Serialize)]
pub(crate) struct HandoffPayload<'a> {
    pub handoff: bool,
    pub args: &'a Value,
}

impl<'a> HandoffPayload<'a> {
    pub fn new(args: &'a Value) -> Self {
        Self {
            handoff: true,
            args,
        }
    }
}

/// Schema of the `handoff_to_<target>` pseudo-tool
///
/// An empty target yields the bare `handoff` tool.
pub fn handoff_tool_schema(target: &str, description: impl Into<String>) -> ToolSchema {
    let name = if target.is_empty() {
        HANDOFF_TOOL.to_string()
    } else {
        format!("{}{}", HANDOFF_PREFIX, target)
    };

    ToolSchema::function(name, description).with_parameters(json!({
        "type": "object",
        "properties": {
            "reason": {
                "type": "string",
                "description": "Why control is being handed over"
            }
        }
    }))
}
