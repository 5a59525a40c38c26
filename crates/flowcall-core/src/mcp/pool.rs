//! Named MCP servers behind one `ToolService`

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::{CallToolResult, RawContent};
use serde_json::Value;

use super::client::{McpClient, McpError, McpResult};
use crate::config::McpServerConfig;
use crate::logging::Logger;
use crate::tools::{ToolCallOutcome, ToolName, ToolService, ToolServiceError};
use crate::types::{FunctionSchema, ToolSchema};

/// Connected MCP servers keyed by the name used in tool names
pub struct McpServerPool {
    servers: BTreeMap<String, McpClient>,
    logger: Arc<dyn Logger>,
}

impl McpServerPool {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            servers: BTreeMap::new(),
            logger,
        }
    }

    /// Connect every configured server
    ///
    /// A server that fails to connect is logged and left out; calls routed
    /// to it report `MCP server not connected`.
    pub async fn connect(configs: &[McpServerConfig], logger: Arc<dyn Logger>) -> Self {
        let mut pool = Self::new(logger.clone());
        for config in configs {
            match McpClient::connect(config, logger.clone()).await {
                Ok(client) => pool.insert(config.name.clone(), client),
                Err(e) => logger.error(&format!(
                    "[McpServerPool] Failed to connect server '{}': {}",
                    config.name, e
                )),
            }
        }
        pool
    }

    pub fn insert(&mut self, name: impl Into<String>, client: McpClient) {
        self.servers.insert(name.into(), client);
    }

    pub fn server_names(&self) -> Vec<&str> {
        self.servers.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Every tool of every server, named `_-_-_<server>_-_-_<tool>`
    pub async fn tool_schemas(&self) -> McpResult<Vec<ToolSchema>> {
        let mut schemas = Vec::new();
        for (server, client) in &self.servers {
            for tool in client.list_tools().await? {
                schemas.push(ToolSchema {
                    kind: "function".to_string(),
                    function: FunctionSchema {
                        name: ToolName::mcp(server, &tool.name),
                        description: tool.description.as_ref().map(|d| d.to_string()),
                        parameters: Value::Object(tool.input_schema.as_ref().clone()),
                    },
                });
            }
        }
        self.logger.info(&format!(
            "[McpServerPool] Discovered {} tools on {} server(s)",
            schemas.len(),
            self.servers.len()
        ));
        Ok(schemas)
    }

    pub async fn close(self) -> McpResult<()> {
        for (name, client) in self.servers {
            if let Err(e) = client.close().await {
                self.logger.warn(&format!(
                    "[McpServerPool] Error closing '{}': {}",
                    name, e
                ));
            }
        }
        Ok(())
    }
}

/// Text content of a tool result, one block per line
fn joined_text(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.clone()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reported outcome of an rmcp tool result
///
/// Structured content wins over the serialized result when the server
/// provides it.
fn outcome_from_result(result: CallToolResult) -> Result<ToolCallOutcome, McpError> {
    if result.is_error.unwrap_or(false) {
        let text = joined_text(&result);
        return Ok(ToolCallOutcome::failed(if text.is_empty() {
            "Tool reported an error".to_string()
        } else {
            text
        }));
    }

    if let Some(structured) = result.structured_content {
        return Ok(ToolCallOutcome::ok(structured));
    }

    serde_json::to_value(&result)
        .map(ToolCallOutcome::ok)
        .map_err(|e| McpError::Protocol(e.to_string()))
}

#[async_trait]
impl ToolService for McpServerPool {
    async fn call_tool(
        &self,
        server: &str,
        tool: &str,
        args: Value,
    ) -> Result<ToolCallOutcome, ToolServiceError> {
        let Some(client) = self.servers.get(server) else {
            return Ok(ToolCallOutcome::failed(format!(
                "MCP server not connected: {}",
                server
            )));
        };

        let result = client.call_tool(tool, args).await?;
        Ok(outcome_from_result(result)?)
    }
}
