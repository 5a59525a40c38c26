//! Chat-completion layer
//!
//! - `CompletionClient`: sends one request; `HttpCompletionClient` for real
//!   endpoints, `MockCompletionClient` for tests
//! - `patch_tool_schemas`: provider compatibility fix applied to tool schemas
//! - `validate_response`: typed decoding of the response body
//! - `CompletionService`: model lookup, key resolution and one round trip

mod client;
mod http;
mod mock;
mod patch;
mod response;
mod service;

pub use client::{CompletionClient, CompletionEndpoint, CompletionError, DEFAULT_BASE_URL};
pub use http::{HttpCompletionClient, DEFAULT_TIMEOUT};
pub use mock::{chat_response, MockCompletionClient, MockCompletionMode};
pub use patch::patch_tool_schemas;
pub use response::{embedded_error, unwrap_embedded_error, validate_response};
pub use service::{CompletionOutcome, CompletionService, ModelCallResult};
