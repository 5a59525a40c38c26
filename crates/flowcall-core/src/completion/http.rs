//! reqwest-backed completion client for OpenAI-compatible endpoints

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::client::{CompletionClient, CompletionEndpoint, CompletionError};
use crate::logging::Logger;
use crate::types::{ChatCompletionRequest, EmbeddedError};

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// `POST <base_url>/chat/completions` with a bearer token
pub struct HttpCompletionClient {
    client: Client,
    logger: Arc<dyn Logger>,
}

impl HttpCompletionClient {
    pub fn new(logger: Arc<dyn Logger>) -> Result<Self, CompletionError> {
        Self::with_timeout(DEFAULT_TIMEOUT, logger)
    }

    pub fn with_timeout(timeout: Duration, logger: Arc<dyn Logger>) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CompletionError::Client(e.to_string()))?;
        Ok(Self { client, logger })
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn create(
        &self,
        endpoint: &CompletionEndpoint,
        request: &ChatCompletionRequest,
    ) -> Result<Value, CompletionError> {
        let url = endpoint.completions_url();
        self.logger.debug(&format!(
            "[HttpCompletionClient] POST {} (model {})",
            url, request.model
        ));

        let response = self
            .client
            .post(&url)
            .bearer_auth(&endpoint.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    CompletionError::Client(e.to_string())
                } else {
                    CompletionError::Api {
                        message: format!("Request to {} failed: {}", url, e),
                        status: e.status().map(|s| s.as_u16()),
                        error_type: None,
                        code: None,
                        param: None,
                    }
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| CompletionError::Api {
            message: format!("Failed to read response body: {}", e),
            status: Some(status.as_u16()),
            error_type: None,
            code: None,
            param: None,
        })?;

        if !status.is_success() {
            self.logger.warn(&format!(
                "[HttpCompletionClient] {} answered {}",
                url, status
            ));
            return Err(error_from_body(status.as_u16(), status.canonical_reason(), &body));
        }

        serde_json::from_str(&body).map_err(|e| CompletionError::Api {
            message: format!("Invalid JSON in completion response: {}", e),
            status: Some(status.as_u16()),
            error_type: None,
            code: None,
            param: None,
        })
    }
}

/// Classify a non-2xx body
///
/// OpenAI-style bodies carry `{"error": {message, type, code, param}}`;
/// some servers send `{"error": "text"}` or plain text instead.
fn error_from_body(status: u16, reason: Option<&str>, body: &str) -> CompletionError {
    let fallback = || match body.trim() {
        "" => format!("HTTP {}{}", status, reason.map(|r| format!(" {}", r)).unwrap_or_default()),
        text => text.to_string(),
    };

    let error = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").cloned());

    match error {
        Some(Value::String(message)) => CompletionError::Api {
            message,
            status: Some(status),
            error_type: None,
            code: None,
            param: None,
        },
        Some(obj @ Value::Object(_)) => {
            let embedded: EmbeddedError = serde_json::from_value(obj).unwrap_or_default();
            CompletionError::Api {
                message: embedded.message.clone().unwrap_or_else(fallback),
                status: Some(status),
                error_type: embedded.error_type.clone(),
                code: embedded.code_text(),
                param: embedded.param_text(),
            }
        }
        _ => CompletionError::Api {
            message: fallback(),
            status: Some(status),
            error_type: None,
            code: None,
            param: None,
        },
    }
}
