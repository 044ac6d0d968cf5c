//! Preference store registry
//!
//! Maps store type names to factories so hosts can pick a backend from
//! configuration without an if-else chain over concrete types.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use picup_core::registry::StoreRegistry;
//! use picup_core::config::StoreConfig;
//!
//! let registry = StoreRegistry::with_builtin();
//! let store = registry
//!     .create_store(&StoreConfig::File { path: "/var/lib/picup/preferences.json".into() })
//!     .await?;
//! ```

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::store::{FilePreferenceStoreFactory, MemoryPreferenceStoreFactory};
use crate::traits::{PreferenceStore, PreferenceStoreFactory};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Registry of preference store factories
#[derive(Default)]
pub struct StoreRegistry {
    stores: RwLock<HashMap<String, Arc<dyn PreferenceStoreFactory>>>,
}

impl StoreRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the `memory` and `file` stores registered
    pub fn with_builtin() -> Self {
        let mut stores: HashMap<String, Arc<dyn PreferenceStoreFactory>> = HashMap::new();
        stores.insert("memory".to_string(), Arc::new(MemoryPreferenceStoreFactory));
        stores.insert("file".to_string(), Arc::new(FilePreferenceStoreFactory));
        Self {
            stores: RwLock::new(stores),
        }
    }

    /// Register a store factory under `name`, replacing any previous one
    pub fn register_store(
        &self,
        name: impl Into<String>,
        factory: Box<dyn PreferenceStoreFactory>,
    ) -> Result<()> {
        let mut stores = self
            .stores
            .write()
            .map_err(|_| Error::config("Store registry lock poisoned"))?;
        stores.insert(name.into(), Arc::from(factory));
        Ok(())
    }

    /// Create a store from configuration
    ///
    /// # Errors
    ///
    /// `Error::Config` if no factory is registered for the store type.
    pub async fn create_store(&self, config: &StoreConfig) -> Result<Box<dyn PreferenceStore>> {
        let store_type = config.type_name();

        let factory = {
            let stores = self
                .stores
                .read()
                .map_err(|_| Error::config("Store registry lock poisoned"))?;
            stores
                .get(store_type)
                .cloned()
                .ok_or_else(|| Error::config(format!("Unknown store type: {store_type}")))?
        };

        let config_json = match config {
            StoreConfig::Custom { config, .. } => config.clone(),
            other => serde_json::to_value(other)?,
        };

        tracing::debug!("Creating '{}' preference store", store_type);
        factory.create(&config_json).await
    }

    /// List registered store type names
    pub fn list_stores(&self) -> Vec<String> {
        self.stores
            .read()
            .map(|stores| stores.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Check whether a store type is registered
    pub fn has_store(&self, name: &str) -> bool {
        self.stores
            .read()
            .map(|stores| stores.contains_key(name))
            .unwrap_or(false)
    }
}
