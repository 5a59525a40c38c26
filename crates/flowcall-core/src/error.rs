//! Pipeline error taxonomy
//!
//! Every public pipeline operation returns `PipelineResult<T>`. Collaborator
//! errors (`CompletionError`, `ToolServiceError`, ...) are translated into
//! one of these variants before they leave the pipeline.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors returned by pipeline operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// The catalog has no model with this id
    #[error("Model not found: {model_id}")]
    ModelNotFound { model_id: String },

    /// The model's credential reference could not be resolved
    #[error("API key error for model {model_id}: {message}")]
    ApiKeyError { model_id: String, message: String },

    /// The completion endpoint failed, or answered with an error body
    #[error("API error: {message}")]
    ApiError {
        message: String,
        status: Option<u16>,
        error_type: Option<String>,
        code: Option<String>,
        param: Option<String>,
    },

    /// Anything the taxonomy does not otherwise cover
    #[error("Unknown error: {message}")]
    Unknown {
        message: String,
        stack: Option<String>,
    },

    /// Tool dispatch failed outside per-call isolation
    #[error("Tool processing failed: {0}")]
    ToolProcessingFailed(String),
}

impl PipelineError {
    pub fn model_not_found(model_id: impl Into<String>) -> Self {
        Self::ModelNotFound {
            model_id: model_id.into(),
        }
    }

    pub fn api_key(model_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ApiKeyError {
            model_id: model_id.into(),
            message: message.into(),
        }
    }

    /// An API error with no status or provider annotations
    pub fn api(message: impl Into<String>) -> Self {
        Self::ApiError {
            message: message.into(),
            status: None,
            error_type: None,
            code: None,
            param: None,
        }
    }

    /// Wrap an arbitrary error, keeping its source chain as the stack
    pub fn unknown(error: &(dyn std::error::Error + 'static)) -> Self {
        let mut chain = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            chain.push(format!("caused by: {}", cause));
            source = cause.source();
        }
        Self::Unknown {
            message: error.to_string(),
            stack: if chain.is_empty() {
                None
            } else {
                Some(chain.join("\n"))
            },
        }
    }

    /// Stable snake_case code for this error
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::ModelNotFound { .. } => "model_not_found",
            PipelineError::ApiKeyError { .. } => "api_key_error",
            PipelineError::ApiError { .. } => "api_error",
            PipelineError::Unknown { .. } => "unknown_error",
            PipelineError::ToolProcessingFailed(_) => "tool_processing_failed",
        }
    }

    /// Whether repeating the same call could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            PipelineError::ApiError { status, .. } => {
                matches!(status, Some(429) | Some(500..=599) | None)
            }
            PipelineError::Unknown { .. } => true,
            _ => false,
        }
    }

    /// Serializable description of this error
    pub fn descriptor(&self) -> ErrorDescriptor {
        let mut details = Map::new();
        match self {
            PipelineError::ModelNotFound { model_id } | PipelineError::ApiKeyError { model_id, .. } => {
                details.insert("modelId".to_string(), Value::from(model_id.as_str()));
            }
            PipelineError::ApiError {
                status,
                error_type,
                code,
                param,
                ..
            } => {
                if let Some(status) = status {
                    details.insert("status".to_string(), Value::from(*status));
                }
                if let Some(error_type) = error_type {
                    details.insert("type".to_string(), Value::from(error_type.as_str()));
                }
                if let Some(code) = code {
                    details.insert("code".to_string(), Value::from(code.as_str()));
                }
                if let Some(param) = param {
                    details.insert("param".to_string(), Value::from(param.as_str()));
                }
            }
            PipelineError::Unknown { stack, .. } => {
                if let Some(stack) = stack {
                    details.insert("stack".to_string(), Value::from(stack.as_str()));
                }
            }
            PipelineError::ToolProcessingFailed(_) => {}
        }

        let message = match self {
            PipelineError::ApiError { message, .. } | PipelineError::Unknown { message, .. } => {
                message.clone()
            }
            PipelineError::ToolProcessingFailed(message) => message.clone(),
            other => other.to_string(),
        };

        ErrorDescriptor {
            kind: self.kind().to_string(),
            message,
            details,
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Error as handed across a serialization boundary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDescriptor {
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub details: Map<String, Value>,
}

/// `{ success: true, value }` or `{ success: false, error }`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Success { success: True, value: T },
    Failure { success: False, error: ErrorDescriptor },
}

/// Serializes as `true`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct True;

/// Serializes as `false`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct False;

impl Serialize for True {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(true)
    }
}

impl Serialize for False {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(false)
    }
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success { .. })
    }
}

impl<T> From<PipelineResult<T>> for Envelope<T> {
    fn from(result: PipelineResult<T>) -> Self {
        match result {
            Ok(value) => Envelope::Success {
                success: True,
                value,
            },
            Err(error) => Envelope::Failure {
                success: False,
                error: error.descriptor(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_kinds() {
        assert_eq!(PipelineError::model_not_found("m").kind(), "model_not_found");
        assert_eq!(PipelineError::api_key("m", "missing").kind(), "api_key_error");
        assert_eq!(PipelineError::api("boom").kind(), "api_error");
        assert_eq!(
            PipelineError::Unknown {
                message: "x".to_string(),
                stack: None
            }
            .kind(),
            "unknown_error"
        );
        assert_eq!(
            PipelineError::ToolProcessingFailed("x".to_string()).kind(),
            "tool_processing_failed"
        );
    }

    #[test]
    fn test_retryable() {
        assert!(!PipelineError::model_not_found("m").is_retryable());
        assert!(!PipelineError::api_key("m", "missing").is_retryable());

        let rate_limited = PipelineError::ApiError {
            message: "slow down".to_string(),
            status: Some(429),
            error_type: None,
            code: None,
            param: None,
        };
        assert!(rate_limited.is_retryable());

        let bad_request = PipelineError::ApiError {
            message: "bad".to_string(),
            status: Some(400),
            error_type: None,
            code: None,
            param: None,
        };
        assert!(!bad_request.is_retryable());
    }

    #[test]
    fn test_api_error_descriptor() {
        let error = PipelineError::ApiError {
            message: "Invalid schema".to_string(),
            status: Some(400),
            error_type: Some("invalid_request_error".to_string()),
            code: Some("invalid_value".to_string()),
            param: Some("tools[0]".to_string()),
        };

        let json = serde_json::to_value(error.descriptor()).unwrap();
        assert_eq!(
            json,
            json!({
                "kind": "api_error",
                "message": "Invalid schema",
                "details": {
                    "status": 400,
                    "type": "invalid_request_error",
                    "code": "invalid_value",
                    "param": "tools[0]"
                }
            })
        );
    }

    #[test]
    fn test_unknown_keeps_source_chain() {
        let inner = std::io::Error::new(std::io::ErrorKind::Other, "socket closed");
        let outer = std::io::Error::new(std::io::ErrorKind::Other, inner);
        let error = PipelineError::unknown(&outer);

        match error {
            PipelineError::Unknown { message, .. } => assert!(message.contains("socket closed")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_envelope_shapes() {
        let ok: Envelope<u32> = Ok(7).into();
        assert!(ok.is_success());
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({ "success": true, "value": 7 }));

        let err: Envelope<u32> = Err(PipelineError::model_not_found("gpt-x")).into();
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["kind"], "model_not_found");
        assert_eq!(json["error"]["details"]["modelId"], "gpt-x");
    }
}
