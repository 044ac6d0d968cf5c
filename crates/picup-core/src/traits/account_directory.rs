//! Account directory trait
//!
//! Exposes which account is active and which accounts are attached. The
//! reconciler only reads from it.

use async_trait::async_trait;

/// Trait for account directory implementations
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// The currently active account, if any account is attached
    async fn current_account_name(&self) -> Result<Option<String>, crate::Error>;

    /// All known account names, in the directory's display order
    async fn all_account_names(&self) -> Result<Vec<String>, crate::Error>;
}
