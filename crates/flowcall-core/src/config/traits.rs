//! Model catalog trait

use async_trait::async_trait;

use crate::types::ModelDescriptor;

/// Source of model connection parameters
///
/// Implementations:
/// - `MemoryModelCatalog`: In-memory, for tests and embedding hosts
/// - `FileModelCatalog`: YAML file (~/.config/flowcall/config.yaml)
/// - Editor backends: whatever database the flow builder keeps models in
#[async_trait]
pub trait ModelCatalog: Send + Sync {
    /// Look up a model by catalog id; `Ok(None)` when the id is absent
    async fn get_model(&self, id: &str) -> ConfigResult<Option<ModelDescriptor>>;

    /// All models in the catalog
    async fn list_models(&self) -> ConfigResult<Vec<ModelDescriptor>>;
}

/// Errors that can occur while reading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Model already exists: {0}")]
    ModelExists(String),

    #[error("Invalid MCP server entry '{name}': {message}")]
    InvalidServer { name: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
