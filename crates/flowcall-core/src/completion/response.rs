//! Completion response validation
//!
//! The raw body is decoded into `ChatCompletionResponse` before anything
//! reads it. Every way a body can be unusable ends up as `ApiError`.

use serde_json::Value;

use crate::error::PipelineError;
use crate::types::{ChatCompletionResponse, ChoiceMessage, EmbeddedError};

/// Decode a completion body and return it with its first choice message
pub fn validate_response(
    body: &Value,
) -> Result<(ChatCompletionResponse, ChoiceMessage), PipelineError> {
    if let Some(Value::String(message)) = body.get("error") {
        return Err(PipelineError::api(message.as_str()));
    }

    let response: ChatCompletionResponse = serde_json::from_value(body.clone())
        .map_err(|e| PipelineError::api(format!("malformed completion response: {}", e)))?;

    if let Some(error) = &response.error {
        return Err(embedded_error(error));
    }

    let message = response
        .first_message()
        .cloned()
        .ok_or_else(|| PipelineError::api("missing choices"))?;

    Ok((response, message))
}

/// `ApiError` for an error object embedded in a 2xx body
///
/// Routers report numeric HTTP-style codes, which become the status.
pub fn embedded_error(error: &EmbeddedError) -> PipelineError {
    let status = error
        .code
        .as_ref()
        .and_then(Value::as_u64)
        .filter(|c| (100..=599).contains(c))
        .map(|c| c as u16);

    PipelineError::ApiError {
        message: unwrap_embedded_error(error),
        status,
        error_type: error.error_type.clone(),
        code: error.code_text(),
        param: error.param_text(),
    }
}

/// Most specific message available for an embedded error
///
/// Prefers the message inside `metadata.raw` (the upstream body a router
/// forwarded), then the top-level message.
pub fn unwrap_embedded_error(error: &EmbeddedError) -> String {
    let nested = error
        .raw_payload()
        .and_then(|raw| serde_json::from_str::<Value>(raw).ok())
        .and_then(|raw| {
            raw.pointer("/error/message")
                .or_else(|| raw.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        });

    nested
        .or_else(|| error.message.clone())
        .unwrap_or_else(|| "Unknown provider error".to_string())
}
