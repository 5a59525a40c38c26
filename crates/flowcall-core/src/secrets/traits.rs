//! Core traits and types for secret storage

use thiserror::Error;

/// Errors that can occur during secret store operations
#[derive(Error, Debug)]
pub enum SecretStoreError {
    #[error("Store is read-only")]
    ReadOnly,

    #[error("Store not available: {0}")]
    NotAvailable(String),

    #[error("Store error: {0}")]
    Other(String),
}

pub type SecretStoreResult<T> = Result<T, SecretStoreError>;

/// Somewhere API keys live
///
/// Model catalogs only hold a *reference* to a key (`openai`,
/// `OPENROUTER_API_KEY`, ...); stores turn references into secrets.
///
/// # Example
///
/// ```
/// use flowcall_core::secrets::{SecretStore, MemorySecretStore};
///
/// let store = MemorySecretStore::new();
/// store.store("openai", "sk-test").unwrap();
/// assert_eq!(store.get("openai"), Some("sk-test".to_string()));
/// ```
pub trait SecretStore: Send + Sync {
    /// Short name, also used as the scope in `name:KEY` references
    fn name(&self) -> &str;

    /// Whether the backing service can be used at all
    ///
    /// A keychain store is unavailable on a headless server, for instance.
    fn is_available(&self) -> bool {
        true
    }

    /// Retrieve a secret by key
    fn get(&self, key: &str) -> Option<String>;

    /// Store a secret
    ///
    /// Returns `Err(SecretStoreError::ReadOnly)` if the store doesn't support writing.
    fn store(&self, key: &str, value: &str) -> SecretStoreResult<()>;

    /// Delete a secret
    fn delete(&self, key: &str) -> SecretStoreResult<()>;

    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}
