//! In-memory account directory
//!
//! Hosts that keep their own account list wrap it in an [`AccountDirectory`]
//! implementation. This one is enough for the CLI and tests.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::AccountDirectory;

#[derive(Debug, Default)]
struct Accounts {
    names: Vec<String>,
    current: Option<String>,
}

/// Ordered account list with an optional active account
#[derive(Debug, Clone, Default)]
pub struct StaticAccountDirectory {
    inner: Arc<RwLock<Accounts>>,
}

impl StaticAccountDirectory {
    /// Create a directory with no accounts attached
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory from names in display order; the first is current
    pub fn with_accounts<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let current = names.first().cloned();
        Self {
            inner: Arc::new(RwLock::new(Accounts { names, current })),
        }
    }

    /// Attach an account; it becomes current if none was
    pub async fn add_account(&self, name: impl Into<String>) {
        let name = name.into();
        let mut guard = self.inner.write().await;
        if !guard.names.contains(&name) {
            guard.names.push(name.clone());
        }
        if guard.current.is_none() {
            guard.current = Some(name);
        }
    }

    /// Detach an account
    ///
    /// Removing the current account promotes the first remaining one.
    pub async fn remove_account(&self, name: &str) {
        let mut guard = self.inner.write().await;
        guard.names.retain(|n| n != name);
        if guard.current.as_deref() == Some(name) {
            guard.current = guard.names.first().cloned();
        }
    }

    /// Make a known account current
    ///
    /// # Errors
    ///
    /// `Error::InvalidInput` if the account is not attached.
    pub async fn set_current(&self, name: &str) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        if !guard.names.iter().any(|n| n == name) {
            return Err(Error::invalid_input(format!("Unknown account: {name}")));
        }
        guard.current = Some(name.to_string());
        Ok(())
    }
}

#[async_trait]
impl AccountDirectory for StaticAccountDirectory {
    async fn current_account_name(&self) -> Result<Option<String>, Error> {
        Ok(self.inner.read().await.current.clone())
    }

    async fn all_account_names(&self) -> Result<Vec<String>, Error> {
        Ok(self.inner.read().await.names.clone())
    }
}
