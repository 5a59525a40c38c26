//! Credential resolution
//!
//! Model descriptors carry a credential *reference*. A `CredentialResolver`
//! turns that reference into the key sent as the bearer token.

use std::sync::Arc;

use async_trait::async_trait;

use crate::logging::{Logger, NoOpLogger};
use crate::secrets::{ChainSecretStore, EnvSecretStore, KeychainSecretStore, SecretStore};

/// Resolves and decrypts a stored API key reference
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    /// The usable secret, or `None` when the reference resolves to nothing
    async fn resolve_api_key(&self, reference: &str) -> Option<String>;
}

/// `CredentialResolver` over a chain of secret stores
///
/// A reference is either bare (`openai`), which walks the chain in order,
/// or scoped to one store by its name (`env:OPENAI_API_KEY`,
/// `keychain:openai`, `memory:test`). An unknown scope is treated as part
/// of a bare reference.
pub struct SecretCredentialResolver {
    stores: ChainSecretStore,
    logger: Arc<dyn Logger>,
}

impl SecretCredentialResolver {
    pub fn new(stores: ChainSecretStore) -> Self {
        Self {
            stores,
            logger: Arc::new(NoOpLogger),
        }
    }

    /// Environment first, then the system keychain
    pub fn with_defaults() -> Self {
        Self::new(ChainSecretStore::new(vec![
            Arc::new(EnvSecretStore::new()),
            Arc::new(KeychainSecretStore::new()),
        ]))
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn stores(&self) -> &ChainSecretStore {
        &self.stores
    }

    fn lookup(&self, reference: &str) -> Option<String> {
        if let Some((scope, key)) = reference.split_once(':') {
            if let Some(store) = self.stores.store_named(scope) {
                if !store.is_available() {
                    self.logger.warn(&format!(
                        "[CredentialResolver] store '{}' is not available",
                        scope
                    ));
                    return None;
                }
                return store.get(key);
            }
        }
        self.stores.get(reference)
    }
}

#[async_trait]
impl CredentialResolver for SecretCredentialResolver {
    async fn resolve_api_key(&self, reference: &str) -> Option<String> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }

        let resolved = self.lookup(reference).filter(|key| !key.is_empty());
        match &resolved {
            Some(_) => self
                .logger
                .debug(&format!("[CredentialResolver] resolved '{}'", reference)),
            None => self
                .logger
                .warn(&format!("[CredentialResolver] nothing stored for '{}'", reference)),
        }
        resolved
    }
}
