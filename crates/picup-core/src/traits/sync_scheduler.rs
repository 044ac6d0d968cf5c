//! Sync scheduler trait
//!
//! The scheduler owns the "last sync" watermark and the upload job. How the
//! job runs is not this crate's concern.

use async_trait::async_trait;

/// Watermark value meaning "never synced, rescan everything"
pub const NEVER_SYNCED: i64 = 0;

/// Trait for sync scheduler implementations
#[async_trait]
pub trait SyncScheduler: Send + Sync {
    /// Replace the last sync watermark (epoch millis)
    ///
    /// Files older than the watermark are treated as already uploaded.
    async fn set_last_sync_timestamp(&self, epoch_millis: i64) -> Result<(), crate::Error>;

    /// Request that the upload job be scheduled
    ///
    /// Fire-and-forget: callers do not inspect the outcome beyond errors.
    async fn schedule_job(&self) -> Result<(), crate::Error>;
}
