//! Tool dispatch
//!
//! - `ToolName`: the `_-_-_<server>_-_-_<tool>` / `handoff_to_*` convention
//! - `ToolService`: seam to whatever hosts MCP tools
//! - `ToolDispatcher`: runs the tool calls of one assistant turn
//!
//! ```text
//! RequestedToolCall ──▶ ToolDispatcher ──┬─▶ handoff (local)
//!                                        └─▶ ToolService::call_tool(server, tool, args)
//!                              │
//!                              ▼
//!          tool-role ConversationMessage + ProcessedToolCall
//! ```

mod name;
mod service;
mod handoff;
mod dispatcher;
mod mock;

pub use name::{is_handoff, ToolName, HANDOFF_PREFIX, HANDOFF_TOOL, MCP_DELIMITER};
pub use service::{ToolCallOutcome, ToolService, ToolServiceError};
pub use handoff::handoff_tool_schema;
pub use dispatcher::{ToolDispatchOutcome, ToolDispatcher};
pub use mock::{MockToolResponse, MockToolService, RecordedToolCall};
