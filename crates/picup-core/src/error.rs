//! Error types for picture upload configuration
//!
//! The reconciler itself never fails on configuration grounds. Every variant
//! here describes a collaborator fault that is propagated verbatim.

use thiserror::Error;

/// Result type alias for picup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for picup
#[derive(Error, Debug)]
pub enum Error {
    /// Preference store errors (I/O, corruption, poisoned locks)
    #[error("Preference store error: {0}")]
    PreferenceStore(String),

    /// Account directory errors
    #[error("Account directory error: {0}")]
    AccountDirectory(String),

    /// Sync scheduler errors
    #[error("Sync scheduler error: {0}")]
    SyncScheduler(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a preference store error
    pub fn preference_store(msg: impl Into<String>) -> Self {
        Self::PreferenceStore(msg.into())
    }

    /// Create an account directory error
    pub fn account_directory(msg: impl Into<String>) -> Self {
        Self::AccountDirectory(msg.into())
    }

    /// Create a sync scheduler error
    pub fn sync_scheduler(msg: impl Into<String>) -> Self {
        Self::SyncScheduler(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
