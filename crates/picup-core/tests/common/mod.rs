//! Test doubles and common utilities for reconciler contract tests
//!
//! The doubles record every collaborator call into one shared log so tests
//! can assert on ordering across collaborators, not just on final state.

#![allow(dead_code)]

use picup_core::error::{Error, Result};
use picup_core::traits::{AccountDirectory, PreferenceStore, SyncScheduler};
use picup_core::{
    FixedClock, MemoryPreferenceStore, PictureUploadsConfig, PictureUploadsReconciler,
    StaticAccountDirectory,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Wall-clock value reported by the test clock
pub const NOW_MILLIS: i64 = 1_714_000_000_000;

/// One collaborator call, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    PutBool(String, bool),
    PutString(String, String),
    PutI64(String, i64),
    Remove(String),
    SetLastSync(i64),
    ScheduleJob,
}

/// Shared, ordered call log
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    /// Timestamps passed to the scheduler, in order
    pub fn last_sync_updates(&self) -> Vec<i64> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::SetLastSync(ts) => Some(ts),
                _ => None,
            })
            .collect()
    }

    /// Position of the first call matching `pred`
    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls().iter().position(pred)
    }
}

/// A preference store that logs writes and counts reads
#[derive(Clone)]
pub struct RecordingStore {
    inner: MemoryPreferenceStore,
    log: CallLog,
    read_count: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
}

impl RecordingStore {
    pub fn new(log: CallLog) -> Self {
        Self {
            inner: MemoryPreferenceStore::new(),
            log,
            read_count: Arc::new(AtomicUsize::new(0)),
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Number of get_* calls made
    pub fn read_count(&self) -> usize {
        self.read_count.load(Ordering::SeqCst)
    }

    /// Make every subsequent write fail with a store error
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(Error::preference_store("disk full"))
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl PreferenceStore for RecordingStore {
    async fn get_bool(&self, key: &str, default: bool) -> Result<bool> {
        self.read_count.fetch_add(1, Ordering::SeqCst);
        self.inner.get_bool(key, default).await
    }

    async fn get_string(&self, key: &str, default: Option<&str>) -> Result<Option<String>> {
        self.read_count.fetch_add(1, Ordering::SeqCst);
        self.inner.get_string(key, default).await
    }

    async fn get_i64(&self, key: &str, default: i64) -> Result<i64> {
        self.read_count.fetch_add(1, Ordering::SeqCst);
        self.inner.get_i64(key, default).await
    }

    async fn put_bool(&self, key: &str, value: bool) -> Result<()> {
        self.check_writable()?;
        self.log.push(Call::PutBool(key.to_string(), value));
        self.inner.put_bool(key, value).await
    }

    async fn put_string(&self, key: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        self.log
            .push(Call::PutString(key.to_string(), value.to_string()));
        self.inner.put_string(key, value).await
    }

    async fn put_i64(&self, key: &str, value: i64) -> Result<()> {
        self.check_writable()?;
        self.log.push(Call::PutI64(key.to_string(), value));
        self.inner.put_i64(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.check_writable()?;
        self.log.push(Call::Remove(key.to_string()));
        self.inner.remove(key).await
    }

    async fn contains(&self, key: &str) -> Result<bool> {
        self.inner.contains(key).await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        self.inner.keys().await
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// A scheduler that only records what it was asked to do
#[derive(Clone)]
pub struct RecordingScheduler {
    log: CallLog,
}

impl RecordingScheduler {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }
}

#[async_trait::async_trait]
impl SyncScheduler for RecordingScheduler {
    async fn set_last_sync_timestamp(&self, epoch_millis: i64) -> Result<()> {
        self.log.push(Call::SetLastSync(epoch_millis));
        Ok(())
    }

    async fn schedule_job(&self) -> Result<()> {
        self.log.push(Call::ScheduleJob);
        Ok(())
    }
}

/// An account directory whose every call fails
pub struct UnreachableAccountDirectory;

#[async_trait::async_trait]
impl AccountDirectory for UnreachableAccountDirectory {
    async fn current_account_name(&self) -> Result<Option<String>> {
        Err(Error::account_directory("account service unavailable"))
    }

    async fn all_account_names(&self) -> Result<Vec<String>> {
        Err(Error::account_directory("account service unavailable"))
    }
}

/// Everything a contract test needs to observe a reconciler
pub struct Harness {
    pub reconciler: PictureUploadsReconciler,
    pub store: RecordingStore,
    pub accounts: StaticAccountDirectory,
    pub log: CallLog,
}

impl Harness {
    /// Build a reconciler over recording doubles with the given accounts
    pub fn with_accounts(names: &[&str]) -> Self {
        Self::build(
            StaticAccountDirectory::with_accounts(names.iter().copied()),
            PictureUploadsConfig::default(),
        )
    }

    /// Build a reconciler over recording doubles with no accounts
    pub fn without_accounts() -> Self {
        Self::build(StaticAccountDirectory::new(), PictureUploadsConfig::default())
    }

    pub fn build(accounts: StaticAccountDirectory, config: PictureUploadsConfig) -> Self {
        let log = CallLog::default();
        let store = RecordingStore::new(log.clone());
        let scheduler = RecordingScheduler::new(log.clone());

        let reconciler = PictureUploadsReconciler::new(
            Arc::new(store.clone()),
            Arc::new(accounts.clone()),
            Arc::new(scheduler),
            config,
        )
        .expect("valid config")
        .with_clock(Arc::new(FixedClock(NOW_MILLIS)));

        Self {
            reconciler,
            store,
            accounts,
            log,
        }
    }
}
