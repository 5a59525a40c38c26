//! MCP client on the official rmcp SDK
//!
//! Connects to one MCP server over Streamable HTTP or a Unix socket.

use std::path::Path;
use std::sync::Arc;

use rmcp::{
    model::{CallToolRequestParams, CallToolResult, ClientCapabilities, ClientInfo, Implementation, Tool},
    service::RunningService,
    RoleClient, ServiceExt,
};
use serde_json::{Map, Value};
use thiserror::Error;

#[cfg(unix)]
use tokio::net::UnixStream;

use crate::config::{ConfigError, McpServerConfig, McpTransport};
use crate::logging::Logger;
use crate::tools::ToolServiceError;

/// MCP client errors
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Tool call failed: {0}")]
    ToolCallFailed(String),

    #[error("Invalid server configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

pub type McpResult<T> = Result<T, McpError>;

impl From<McpError> for ToolServiceError {
    fn from(error: McpError) -> Self {
        match error {
            McpError::ConnectionFailed(m) => ToolServiceError::Transport(m),
            McpError::ToolCallFailed(m) | McpError::Protocol(m) | McpError::InitializationFailed(m) => {
                ToolServiceError::Protocol(m)
            }
            McpError::Config(e) => ToolServiceError::Other(e.to_string()),
        }
    }
}

/// MCP tool arguments are a JSON object; `null` means none
fn tool_arguments(arguments: Value) -> McpResult<Option<Map<String, Value>>> {
    match arguments {
        Value::Object(map) => Ok(Some(map)),
        Value::Null => Ok(None),
        other => Err(McpError::Protocol(format!(
            "tool arguments must be a JSON object, got {}",
            other
        ))),
    }
}

fn client_info() -> ClientInfo {
    ClientInfo {
        meta: None,
        protocol_version: Default::default(),
        capabilities: ClientCapabilities::default(),
        client_info: Implementation {
            name: "flowcall-core".to_string(),
            title: Some("Flowcall".to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            website_url: None,
            icons: None,
        },
    }
}

/// Connection to one MCP server
pub struct McpClient {
    client: RunningService<RoleClient, ClientInfo>,
    logger: Arc<dyn Logger>,
}

impl McpClient {
    /// Connect using a config entry
    pub async fn connect(config: &McpServerConfig, logger: Arc<dyn Logger>) -> McpResult<Self> {
        match config.transport()? {
            McpTransport::Http(url) => Self::connect_http(&url, logger).await,
            #[cfg(unix)]
            McpTransport::Unix(path) => Self::connect_unix(path, logger).await,
            #[cfg(not(unix))]
            McpTransport::Unix(path) => Err(McpError::ConnectionFailed(format!(
                "Unix sockets are not supported on this platform: {:?}",
                path
            ))),
        }
    }

    /// Connect to an MCP server over a Unix socket
    #[cfg(unix)]
    pub async fn connect_unix<P: AsRef<Path>>(
        socket_path: P,
        logger: Arc<dyn Logger>,
    ) -> McpResult<Self> {
        let path = socket_path.as_ref();
        logger.info(&format!("[McpClient] Connecting to Unix socket: {:?}", path));

        let stream = UnixStream::connect(path)
            .await
            .map_err(|e| McpError::ConnectionFailed(e.to_string()))?;

        let client = client_info()
            .serve(stream)
            .await
            .map_err(|e| McpError::InitializationFailed(e.to_string()))?;

        logger.info("[McpClient] Connected and initialized");
        Ok(Self { client, logger })
    }

    /// Connect to an MCP server over HTTP (Streamable HTTP transport)
    pub async fn connect_http(url: &str, logger: Arc<dyn Logger>) -> McpResult<Self> {
        use rmcp::transport::StreamableHttpClientTransport;

        logger.info(&format!("[McpClient] Connecting to HTTP: {}", url));

        let transport = StreamableHttpClientTransport::from_uri(url);
        let client = client_info()
            .serve(transport)
            .await
            .map_err(|e| McpError::InitializationFailed(e.to_string()))?;

        logger.info("[McpClient] Connected and initialized");
        Ok(Self { client, logger })
    }

    pub async fn list_tools(&self) -> McpResult<Vec<Tool>> {
        let result = self
            .client
            .list_tools(Default::default())
            .await
            .map_err(|e| McpError::Protocol(e.to_string()))?;

        self.logger
            .debug(&format!("[McpClient] Listed {} tools", result.tools.len()));
        Ok(result.tools)
    }

    /// Call a tool by its server-local name
    pub async fn call_tool(&self, name: &str, arguments: Value) -> McpResult<CallToolResult> {
        self.logger.debug(&format!("[McpClient] Calling tool: {}", name));

        let params = CallToolRequestParams {
            meta: None,
            name: name.to_owned().into(),
            arguments: tool_arguments(arguments)?,
            task: None,
        };

        self.client
            .call_tool(params)
            .await
            .map_err(|e| McpError::ToolCallFailed(e.to_string()))
    }

    pub fn server_info(&self) -> Option<&Implementation> {
        self.client.peer_info().map(|info| &info.server_info)
    }

    pub async fn close(self) -> McpResult<()> {
        self.logger.info("[McpClient] Closing connection");
        self.client
            .cancel()
            .await
            .map_err(|e| McpError::Protocol(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;

    #[test]
    fn test_error_mapping() {
        let transport: ToolServiceError = McpError::ConnectionFailed("refused".into()).into();
        assert_eq!(transport, ToolServiceError::Transport("refused".into()));

        let protocol: ToolServiceError = McpError::ToolCallFailed("bad params".into()).into();
        assert_eq!(protocol, ToolServiceError::Protocol("bad params".into()));
    }

    #[test]
    fn test_tool_arguments_must_be_an_object() {
        let args = tool_arguments(serde_json::json!({ "q": "x" })).unwrap().unwrap();
        assert_eq!(args["q"], "x");
        assert!(tool_arguments(Value::Null).unwrap().is_none());

        let err = tool_arguments(serde_json::json!([1, 2])).unwrap_err();
        assert!(matches!(err, McpError::Protocol(_)));
        let mapped: ToolServiceError = err.into();
        assert_eq!(
            mapped.to_string(),
            "Protocol error: tool arguments must be a JSON object, got [1,2]"
        );
        assert!(tool_arguments(serde_json::json!(7)).is_err());
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_entry() {
        let config = McpServerConfig {
            name: "both".to_string(),
            url: Some("http://localhost:1/mcp".to_string()),
            socket: Some("/tmp/x.sock".into()),
        };
        let result = McpClient::connect(&config, Arc::new(NoOpLogger)).await;
        assert!(matches!(result, Err(McpError::Config(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_connect_unix_missing_socket() {
        let dir = tempfile::tempdir().unwrap();
        let result = McpClient::connect_unix(dir.path().join("absent.sock"), Arc::new(NoOpLogger)).await;
        assert!(matches!(result, Err(McpError::ConnectionFailed(_))));
    }
}
