//! Tool/function calling types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Function part of a tool schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSchema {
    /// Function name the model will call
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema of the arguments object
    #[serde(default = "empty_object_schema")]
    pub parameters: Value,
}

fn empty_object_schema() -> Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

/// Tool definition in chat-completion wire form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionSchema,
}

impl ToolSchema {
    /// Create a function tool with an empty argument schema
    pub fn function(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: "function".to_string(),
            function: FunctionSchema {
                name: name.into(),
                description: Some(description.into()),
                parameters: empty_object_schema(),
            },
        }
    }

    /// Set the argument schema
    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.function.parameters = parameters;
        self
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }

    /// Top-level argument properties, if the schema declares any
    pub fn properties(&self) -> Option<&Map<String, Value>> {
        self.function
            .parameters
            .get("properties")
            .and_then(Value::as_object)
    }
}

/// Record of one tool invocation attempt
///
/// Produced for every requested call, including failed ones; a failure is
/// a `result` starting with `Error:`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedToolCall {
    pub name: String,
    pub args: Value,
    pub id: String,
    pub result: String,
}

impl ProcessedToolCall {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        args: Value,
        result: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            args,
            id: id.into(),
            result: result.into(),
        }
    }

    /// Whether the recorded result is an error string
    pub fn is_error(&self) -> bool {
        self.result.starts_with("Error:")
    }
}

/// An empty JSON object, used wherever arguments could not be recovered
pub fn empty_args() -> Value {
    Value::Object(Map::new())
}
