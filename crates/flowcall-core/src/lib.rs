//! Flowcall Core
//!
//! Model-call and tool-dispatch pipeline for the nodes of a visual flow
//! builder. One invocation performs exactly one chat-completion request;
//! looping over tool calls is up to the caller.
//!
//! ## Pipeline
//!
//! ```rust,ignore
//! use flowcall_core::{CallModelParams, FlowPipeline, PipelineServices};
//!
//! let pipeline = FlowPipeline::new(services, logger);
//!
//! let turn = pipeline
//!     .call_model(CallModelParams {
//!         model_id: "gpt4o",
//!         prompt: "You are the billing assistant.",
//!         messages: &transcript,
//!         tools: Some(tools.as_slice()),
//!         node_name: "Billing",
//!         process_node_id: Some("node-7"),
//!     })
//!     .await?;
//!
//! // Run whatever the model asked for
//! let requested = turn.messages.last().map(|m| m.requested_tool_calls()).unwrap_or(&[]);
//! let dispatched = pipeline.process_tool_calls(requested).await?;
//! ```
//!
//! Collaborators are trait objects: `ModelCatalog`, `CredentialResolver`,
//! `CompletionClient` and `ToolService`. The crate ships in-memory, file,
//! HTTP and MCP implementations of each.

pub mod types;
pub mod error;
pub mod logging;
pub mod config;
pub mod secrets;
pub mod credentials;
pub mod completion;
pub mod transcript;
pub mod extract;
pub mod tools;
pub mod mcp;
pub mod pipeline;

// Re-export commonly used types
pub use types::{
    ConversationMessage, MessageRole, ModelDescriptor, ProcessedToolCall, RequestedToolCall,
    ToolSchema,
};

pub use error::{Envelope, ErrorDescriptor, PipelineError, PipelineResult};

pub use logging::{ConsoleLogger, FileLogger, LogLevel, Logger, MemoryLogger, NoOpLogger};

pub use config::{FileModelCatalog, MemoryModelCatalog, ModelCatalog};

pub use secrets::{
    ChainSecretStore, EnvSecretStore, KeychainSecretStore, MemorySecretStore, SecretStore,
    SecretStoreError, SecretStoreResult,
};

pub use credentials::{CredentialResolver, SecretCredentialResolver};

pub use completion::{
    CompletionClient, CompletionEndpoint, CompletionError, CompletionService,
    HttpCompletionClient, ModelCallResult,
};

pub use tools::{ToolCallOutcome, ToolDispatchOutcome, ToolDispatcher, ToolName, ToolService};

pub use mcp::{McpClient, McpError, McpServerPool};

pub use pipeline::{CallModelParams, FlowPipeline, PipelineServices};
