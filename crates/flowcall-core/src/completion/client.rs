//! Completion client seam

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::types::ChatCompletionRequest;

/// Base URL used when a model does not configure one
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Where and as whom a completion request is sent
#[derive(Clone, PartialEq, Eq)]
pub struct CompletionEndpoint {
    pub base_url: String,
    pub api_key: String,
}

impl CompletionEndpoint {
    pub fn new(base_url: Option<&str>, api_key: impl Into<String>) -> Self {
        let base_url = base_url
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(DEFAULT_BASE_URL);
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// `<base_url>/chat/completions`
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl std::fmt::Debug for CompletionEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionEndpoint")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Errors raised by a completion client
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompletionError {
    /// The endpoint could not be reached, refused the request, or answered
    /// with something that is not JSON
    #[error("{message}")]
    Api {
        message: String,
        status: Option<u16>,
        error_type: Option<String>,
        code: Option<String>,
        param: Option<String>,
    },

    /// The client itself failed before a request went out
    #[error("Completion client error: {0}")]
    Client(String),
}

impl CompletionError {
    /// An API error with only a message
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            status: None,
            error_type: None,
            code: None,
            param: None,
        }
    }
}

/// Sends one chat-completion request and returns the raw JSON body
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn create(
        &self,
        endpoint: &CompletionEndpoint,
        request: &ChatCompletionRequest,
    ) -> Result<Value, CompletionError>;
}
