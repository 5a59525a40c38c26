//! MCP (Model Context Protocol) tool routing
//!
//! Uses the official rmcp SDK. `McpServerPool` keeps one `McpClient` per
//! configured server and implements `ToolService`, so
//! `_-_-_<server>_-_-_<tool>` calls from the model reach the right server.
//!
//! # Example
//!
//! ```rust,ignore
//! use flowcall_core::{config::FileModelCatalog, mcp::McpServerPool};
//!
//! let config = FileModelCatalog::user();
//! let pool = McpServerPool::connect(&config.mcp_servers()?, logger.clone()).await;
//!
//! // Tool schemas to send with the model call
//! let tools = pool.tool_schemas().await?;
//! ```

mod client;
mod pool;

pub use client::{McpClient, McpError, McpResult};
pub use pool::McpServerPool;

// Re-export rmcp types that consumers might need
pub use rmcp::model::{CallToolResult as McpToolResult, Tool as McpTool};
