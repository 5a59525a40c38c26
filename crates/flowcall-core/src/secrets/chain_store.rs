//! Chained secret store with fallback behavior

use std::sync::Arc;

use super::traits::{SecretStore, SecretStoreError, SecretStoreResult};

/// Tries several stores in order
///
/// Reads return the first hit among available stores. Writes go to the
/// first writable store, so a chain of `[env, memory]` writes to memory.
pub struct ChainSecretStore {
    stores: Vec<Arc<dyn SecretStore>>,
}

impl ChainSecretStore {
    pub fn new(stores: Vec<Arc<dyn SecretStore>>) -> Self {
        Self { stores }
    }

    pub fn stores(&self) -> &[Arc<dyn SecretStore>] {
        &self.stores
    }

    /// Store with the given name, if it is part of the chain
    pub fn store_named(&self, name: &str) -> Option<&Arc<dyn SecretStore>> {
        self.stores.iter().find(|s| s.name() == name)
    }

    /// First available store that holds `key`
    pub fn find_store(&self, key: &str) -> Option<&Arc<dyn SecretStore>> {
        self.stores
            .iter()
            .find(|s| s.is_available() && s.has(key))
    }
}

impl SecretStore for ChainSecretStore {
    fn name(&self) -> &str {
        "chain"
    }

    fn is_available(&self) -> bool {
        self.stores.iter().any(|s| s.is_available())
    }

    fn get(&self, key: &str) -> Option<String> {
        self.stores
            .iter()
            .filter(|s| s.is_available())
            .find_map(|s| s.get(key))
    }

    fn store(&self, key: &str, value: &str) -> SecretStoreResult<()> {
        for store in self.stores.iter().filter(|s| s.is_available()) {
            match store.store(key, value) {
                Err(SecretStoreError::ReadOnly) => continue,
                other => return other,
            }
        }
        Err(SecretStoreError::ReadOnly)
    }

    fn delete(&self, key: &str) -> SecretStoreResult<()> {
        // Read-only stores keep their copy.
        for store in &self.stores {
            if store.has(key) {
                match store.delete(key) {
                    Ok(()) | Err(SecretStoreError::ReadOnly) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for ChainSecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.stores.iter().map(|s| s.name()).collect();
        f.debug_struct("ChainSecretStore").field("stores", &names).finish()
    }
}
