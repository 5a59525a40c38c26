//! Provider compatibility patch for tool schemas
//!
//! Some providers reject string `format` values other than `enum` and
//! `date-time`. Tools that take an image URL commonly declare
//! `"format": "uri"`, so that key is dropped before sending.

use serde_json::Value;

use crate::types::ToolSchema;

/// Parameter whose `format` constraint is removed
const IMAGE_URL_PARAM: &str = "imageUrl";

/// Copy of `tools` with the `format` key removed from every top-level
/// `imageUrl` parameter of type `string`
///
/// The input schemas are left untouched.
pub fn patch_tool_schemas(tools: &[ToolSchema]) -> Vec<ToolSchema> {
    tools
        .iter()
        .cloned()
        .map(|mut tool| {
            if let Some(Value::Object(param)) = tool
                .function
                .parameters
                .get_mut("properties")
                .and_then(|p| p.get_mut(IMAGE_URL_PARAM))
            {
                if param.get("type").and_then(Value::as_str) == Some("string") {
                    param.remove("format");
                }
            }
            tool
        })
        .collect()
}
