// # Memory Preference Store
//
// In-memory implementation of PreferenceStore.
//
// ## Purpose
//
// Nothing survives a restart. Useful for tests and for embedding the
// reconciler in a host that persists settings elsewhere.
//
// ## Crash Behavior
//
// - All preferences are lost on restart/crash
// - The feature reads as disabled with default paths afterwards

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::preference_store::{PreferenceStore, PreferenceStoreFactory, PreferenceValue};

/// In-memory preference store
///
/// Clones share the same underlying map, so a test can keep a handle while
/// the reconciler owns another.
///
/// # Example
///
/// ```rust,no_run
/// use picup_core::store::MemoryPreferenceStore;
/// use picup_core::traits::PreferenceStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryPreferenceStore::new();
///
///     store.put_string("camera_picture_uploads_path", "/Photos").await?;
///     let path = store.get_string("camera_picture_uploads_path", None).await?;
///     assert_eq!(path.as_deref(), Some("/Photos"));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryPreferenceStore {
    inner: Arc<RwLock<HashMap<String, PreferenceValue>>>,
}

impl MemoryPreferenceStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get the number of stored entries
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Raw access to a stored value, regardless of its type
    pub async fn value(&self, key: &str) -> Option<PreferenceValue> {
        self.inner.read().await.get(key).cloned()
    }

    /// Clear all entries from the store
    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }

    async fn put(&self, key: &str, value: PreferenceValue) {
        self.inner.write().await.insert(key.to_string(), value);
    }
}

impl Default for MemoryPreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn get_bool(&self, key: &str, default: bool) -> Result<bool, Error> {
        let guard = self.inner.read().await;
        Ok(guard.get(key).and_then(PreferenceValue::as_bool).unwrap_or(default))
    }

    async fn get_string(&self, key: &str, default: Option<&str>) -> Result<Option<String>, Error> {
        let guard = self.inner.read().await;
        Ok(guard
            .get(key)
            .and_then(PreferenceValue::as_str)
            .or(default)
            .map(str::to_string))
    }

    async fn get_i64(&self, key: &str, default: i64) -> Result<i64, Error> {
        let guard = self.inner.read().await;
        Ok(guard.get(key).and_then(PreferenceValue::as_i64).unwrap_or(default))
    }

    async fn put_bool(&self, key: &str, value: bool) -> Result<(), Error> {
        self.put(key, PreferenceValue::Bool(value)).await;
        Ok(())
    }

    async fn put_string(&self, key: &str, value: &str) -> Result<(), Error> {
        self.put(key, PreferenceValue::String(value.to_string())).await;
        Ok(())
    }

    async fn put_i64(&self, key: &str, value: i64) -> Result<(), Error> {
        self.put(key, PreferenceValue::Int(value)).await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), Error> {
        self.inner.write().await.remove(key);
        Ok(())
    }

    async fn contains(&self, key: &str) -> Result<bool, Error> {
        Ok(self.inner.read().await.contains_key(key))
    }

    async fn keys(&self) -> Result<Vec<String>, Error> {
        Ok(self.inner.read().await.keys().cloned().collect())
    }

    async fn flush(&self) -> Result<(), Error> {
        // Nothing buffered
        Ok(())
    }
}

/// Factory for `StoreConfig::Memory`
#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryPreferenceStoreFactory;

#[async_trait]
impl PreferenceStoreFactory for MemoryPreferenceStoreFactory {
    async fn create(&self, _config: &serde_json::Value) -> Result<Box<dyn PreferenceStore>, Error> {
        Ok(Box::new(MemoryPreferenceStore::new()))
    }
}
