//! Configuration and the model catalog
//!
//! - `MemoryModelCatalog`: In-memory for tests and embedding hosts
//! - `FileModelCatalog`: YAML file-based (user/workspace level)

mod traits;
mod memory;
mod file;

pub use traits::{ModelCatalog, ConfigError, ConfigResult};
pub use memory::MemoryModelCatalog;
pub use file::{FileModelCatalog, ConfigFile, ConfigLevel, McpServerConfig, McpTransport};
