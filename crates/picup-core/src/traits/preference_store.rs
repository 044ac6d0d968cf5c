// # Preference Store Trait
//
// Defines the interface for durable key-value settings.
//
// ## Purpose
//
// Picture upload configuration lives entirely in preference entries. The
// reconciler keeps no state of its own, so every read goes through here with
// an explicit default and every write is a single-key operation.
//
// ## Guarantees
//
// - Single-key reads and writes are atomic
// - No cross-key transactions: a crash between two writes may leave a
//   partially applied change, and readers must tolerate it
//
// ## Implementations
//
// - Memory: `MemoryPreferenceStore`
// - File: `FilePreferenceStore` (JSON, atomic rename)
//
// ## Usage
//
// ```rust
// use picup_core::PreferenceStore;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let store = /* PreferenceStore implementation */;
//
//     store.put_bool("camera_picture_uploads_enabled", true).await?;
//     let enabled = store.get_bool("camera_picture_uploads_enabled", false).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single stored preference value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum PreferenceValue {
    /// Boolean flag
    Bool(bool),
    /// Signed integer (timestamps are stored as epoch millis)
    Int(i64),
    /// Free-form string
    String(String),
}

impl PreferenceValue {
    /// Returns the boolean payload, if this is a boolean entry
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PreferenceValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the integer payload, if this is an integer entry
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PreferenceValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string payload, if this is a string entry
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PreferenceValue::String(value) => Some(value),
            _ => None,
        }
    }
}

/// Trait for preference store implementations
///
/// Every getter takes the default to return when the key is unset. A key
/// holding a value of another type also yields the default, matching how
/// typed preference APIs treat mismatched entries as missing.
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks. Each
/// call is serializable on its own; nothing is batched.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Read a boolean, or `default` if unset
    async fn get_bool(&self, key: &str, default: bool) -> Result<bool, crate::Error>;

    /// Read a string, or `default` if unset
    ///
    /// # Returns
    ///
    /// - `Ok(Some(String))`: The stored value, or the default when one was given
    /// - `Ok(None)`: Unset and no default supplied
    /// - `Err(Error)`: Storage error
    async fn get_string(
        &self,
        key: &str,
        default: Option<&str>,
    ) -> Result<Option<String>, crate::Error>;

    /// Read an integer, or `default` if unset
    async fn get_i64(&self, key: &str, default: i64) -> Result<i64, crate::Error>;

    /// Write a boolean
    async fn put_bool(&self, key: &str, value: bool) -> Result<(), crate::Error>;

    /// Write a string
    async fn put_string(&self, key: &str, value: &str) -> Result<(), crate::Error>;

    /// Write an integer
    async fn put_i64(&self, key: &str, value: i64) -> Result<(), crate::Error>;

    /// Remove a key
    ///
    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), crate::Error>;

    /// Check whether a key holds any value
    async fn contains(&self, key: &str) -> Result<bool, crate::Error>;

    /// List all stored keys
    async fn keys(&self) -> Result<Vec<String>, crate::Error>;

    /// Persist any pending changes
    async fn flush(&self) -> Result<(), crate::Error>;
}

/// Helper trait for constructing preference stores from configuration
#[async_trait]
pub trait PreferenceStoreFactory: Send + Sync {
    /// Create a PreferenceStore instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: The serialized `StoreConfig` for this store
    async fn create(
        &self,
        config: &serde_json::Value,
    ) -> Result<Box<dyn PreferenceStore>, crate::Error>;
}
