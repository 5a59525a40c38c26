//! File-based configuration (YAML)
//!
//! Supports user-level (~/.config/flowcall/config.yaml) and workspace-level
//! (.config/flowcall/config.yaml) files. The file carries the model catalog,
//! the MCP servers tool calls are routed to, and the log level.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::traits::{ConfigError, ConfigResult, ModelCatalog};
use crate::logging::LogLevel;
use crate::types::ModelDescriptor;

/// How to reach one MCP server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpServerConfig {
    /// Name used in `_-_-_<server>_-_-_<tool>` tool names
    pub name: String,
    /// Streamable HTTP endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Unix socket path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket: Option<PathBuf>,
}

/// Resolved transport for an MCP server entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum McpTransport {
    Http(String),
    Unix(PathBuf),
}

impl McpServerConfig {
    pub fn http(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: Some(url.into()),
            socket: None,
        }
    }

    pub fn unix(name: impl Into<String>, socket: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            url: None,
            socket: Some(socket.into()),
        }
    }

    /// Exactly one of `url` / `socket` must be set, and the name must not
    /// contain the tool-name delimiter
    pub fn transport(&self) -> ConfigResult<McpTransport> {
        if self.name.is_empty() || self.name.contains(crate::tools::MCP_DELIMITER) {
            return Err(ConfigError::InvalidServer {
                name: self.name.clone(),
                message: format!(
                    "server names must be non-empty and must not contain '{}'",
                    crate::tools::MCP_DELIMITER
                ),
            });
        }
        match (&self.url, &self.socket) {
            (Some(url), None) => Ok(McpTransport::Http(url.clone())),
            (None, Some(socket)) => Ok(McpTransport::Unix(socket.clone())),
            (Some(_), Some(_)) => Err(ConfigError::InvalidServer {
                name: self.name.clone(),
                message: "set either url or socket, not both".to_string(),
            }),
            (None, None) => Err(ConfigError::InvalidServer {
                name: self.name.clone(),
                message: "one of url or socket is required".to_string(),
            }),
        }
    }
}

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigFile {
    /// Minimum log level (debug, info, warn, error)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Model catalog
    #[serde(default)]
    pub models: Vec<ModelDescriptor>,

    /// MCP servers tool calls are routed to
    #[serde(default)]
    pub mcp_servers: Vec<McpServerConfig>,
}

impl ConfigFile {
    /// Parse YAML text
    pub fn from_yaml(text: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Configured log level; unknown or missing names fall back to info
    pub fn log_level(&self) -> LogLevel {
        self.log_level
            .as_deref()
            .and_then(LogLevel::parse)
            .unwrap_or_default()
    }
}

/// Config level (user or workspace)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLevel {
    /// User-level config (~/.config/flowcall/config.yaml)
    User,
    /// Workspace-level config (.config/flowcall/config.yaml in workspace root)
    Workspace,
}

impl ConfigLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigLevel::User => "user",
            ConfigLevel::Workspace => "workspace",
        }
    }
}

/// Model catalog backed by a YAML config file
///
/// The file is read once and cached; `reload` picks up external edits.
/// A missing file is an empty configuration.
///
/// # Example
///
/// ```no_run
/// use flowcall_core::config::FileModelCatalog;
///
/// let user = FileModelCatalog::user();
/// let workspace = FileModelCatalog::workspace("/path/to/workspace");
/// ```
pub struct FileModelCatalog {
    path: PathBuf,
    level: ConfigLevel,
    cache: RwLock<Option<ConfigFile>>,
}

impl FileModelCatalog {
    /// Create a catalog for a specific path
    pub fn new(path: impl Into<PathBuf>, level: ConfigLevel) -> Self {
        Self {
            path: path.into(),
            level,
            cache: RwLock::new(None),
        }
    }

    /// User-level config (~/.config/flowcall/config.yaml)
    pub fn user() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        Self::new(config_dir.join("flowcall").join("config.yaml"), ConfigLevel::User)
    }

    /// Workspace-level config (.config/flowcall/config.yaml)
    pub fn workspace(workspace_root: impl AsRef<Path>) -> Self {
        let path = workspace_root
            .as_ref()
            .join(".config")
            .join("flowcall")
            .join("config.yaml");
        Self::new(path, ConfigLevel::Workspace)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn level(&self) -> ConfigLevel {
        self.level
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn load(&self) -> ConfigResult<ConfigFile> {
        if !self.path.exists() {
            return Ok(ConfigFile::default());
        }
        let content = fs::read_to_string(&self.path)?;
        ConfigFile::from_yaml(&content)
    }

    /// Cached config, loading it on first use
    pub fn config(&self) -> ConfigResult<ConfigFile> {
        if let Some(config) = self.cache.read().as_ref() {
            return Ok(config.clone());
        }
        self.reload()
    }

    /// Re-read the file, replacing the cache
    pub fn reload(&self) -> ConfigResult<ConfigFile> {
        let config = self.load()?;
        *self.cache.write() = Some(config.clone());
        Ok(config)
    }

    pub fn mcp_servers(&self) -> ConfigResult<Vec<McpServerConfig>> {
        Ok(self.config()?.mcp_servers)
    }

    pub fn log_level(&self) -> ConfigResult<LogLevel> {
        Ok(self.config()?.log_level())
    }
}

impl std::fmt::Debug for FileModelCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileModelCatalog")
            .field("path", &self.path)
            .field("level", &self.level)
            .field("exists", &self.exists())
            .finish()
    }
}

#[async_trait]
impl ModelCatalog for FileModelCatalog {
    async fn get_model(&self, id: &str) -> ConfigResult<Option<ModelDescriptor>> {
        Ok(self.config()?.models.into_iter().find(|m| m.id == id))
    }

    async fn list_models(&self) -> ConfigResult<Vec<ModelDescriptor>> {
        Ok(self.config()?.models)
    }
}
