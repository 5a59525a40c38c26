//! In-memory model catalog

use async_trait::async_trait;
use parking_lot::RwLock;

use super::traits::{ConfigError, ConfigResult, ModelCatalog};
use crate::types::ModelDescriptor;

/// Model catalog held in memory
#[derive(Debug, Default)]
pub struct MemoryModelCatalog {
    models: RwLock<Vec<ModelDescriptor>>,
}

impl MemoryModelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog with initial models
    pub fn with_models(models: Vec<ModelDescriptor>) -> Self {
        Self {
            models: RwLock::new(models),
        }
    }

    /// Add a model; ids are unique
    pub fn add_model(&self, model: ModelDescriptor) -> ConfigResult<()> {
        let mut models = self.models.write();
        if models.iter().any(|m| m.id == model.id) {
            return Err(ConfigError::ModelExists(model.id));
        }
        models.push(model);
        Ok(())
    }

    /// Replace the model with the same id
    pub fn update_model(&self, model: ModelDescriptor) -> ConfigResult<()> {
        let mut models = self.models.write();
        match models.iter_mut().find(|m| m.id == model.id) {
            Some(slot) => {
                *slot = model;
                Ok(())
            }
            None => Err(ConfigError::ModelNotFound(model.id)),
        }
    }

    pub fn remove_model(&self, id: &str) -> ConfigResult<()> {
        let mut models = self.models.write();
        let before = models.len();
        models.retain(|m| m.id != id);
        if models.len() == before {
            Err(ConfigError::ModelNotFound(id.to_string()))
        } else {
            Ok(())
        }
    }

    pub fn clear(&self) {
        self.models.write().clear();
    }
}

#[async_trait]
impl ModelCatalog for MemoryModelCatalog {
    async fn get_model(&self, id: &str) -> ConfigResult<Option<ModelDescriptor>> {
        Ok(self.models.read().iter().find(|m| m.id == id).cloned())
    }

    async fn list_models(&self) -> ConfigResult<Vec<ModelDescriptor>> {
        Ok(self.models.read().clone())
    }
}
