//! Secret storage
//!
//! - `SecretStore` trait for implementing custom stores
//! - `EnvSecretStore`, `MemorySecretStore`, `ChainSecretStore`, `KeychainSecretStore`

mod traits;
mod env_store;
mod memory_store;
mod chain_store;
mod keychain_store;

pub use traits::{SecretStore, SecretStoreError, SecretStoreResult};
pub use env_store::EnvSecretStore;
pub use memory_store::MemorySecretStore;
pub use chain_store::ChainSecretStore;
pub use keychain_store::KeychainSecretStore;
