//! Preference-backed sync scheduler
//!
//! Persists the sync watermark next to the other settings and reports
//! scheduling requests to whatever runs the upload job.
//!
//! ```text
//! ┌──────────────┐  set_last_sync_timestamp   ┌─────────────────┐
//! │  Reconciler  │───────────────────────────▶│ PreferenceStore │
//! └──────────────┘                            │ last_sync_...   │
//!        │ schedule_job                       └─────────────────┘
//!        ▼
//! ┌──────────────┐     SchedulerEvent          ┌─────────────────┐
//! │  Scheduler   │────────────────────────────▶│   Job runner    │
//! └──────────────┘     (bounded channel)       └─────────────────┘
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::Error;
use crate::keys;
use crate::traits::{NEVER_SYNCED, PreferenceStore, SyncScheduler};

/// Default capacity of the scheduler event channel
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Events emitted by the scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerEvent {
    /// The watermark was replaced
    LastSyncUpdated {
        epoch_millis: i64,
    },

    /// The upload job was requested
    JobRequested,
}

/// Sync scheduler that stores the watermark in a preference store
pub struct PreferenceSyncScheduler {
    store: Arc<dyn PreferenceStore>,
    event_tx: mpsc::Sender<SchedulerEvent>,
}

impl PreferenceSyncScheduler {
    /// Create a scheduler writing to `store`
    ///
    /// # Returns
    ///
    /// A tuple of (scheduler, event_receiver)
    pub fn new(
        store: Arc<dyn PreferenceStore>,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<SchedulerEvent>) {
        let (event_tx, event_rx) = mpsc::channel(capacity.max(1));
        (Self { store, event_tx }, event_rx)
    }

    /// Current watermark, [`NEVER_SYNCED`] if never written
    pub async fn last_sync_timestamp(&self) -> Result<i64, Error> {
        self.store.get_i64(keys::LAST_SYNC_TIMESTAMP, NEVER_SYNCED).await
    }

    fn emit_event(&self, event: SchedulerEvent) {
        if self.event_tx.try_send(event).is_err() {
            warn!("Scheduler event channel full or closed, dropping event");
        }
    }
}

#[async_trait]
impl SyncScheduler for PreferenceSyncScheduler {
    async fn set_last_sync_timestamp(&self, epoch_millis: i64) -> Result<(), Error> {
        self.store
            .put_i64(keys::LAST_SYNC_TIMESTAMP, epoch_millis)
            .await?;
        info!("Picture uploads last sync set to {}", epoch_millis);
        self.emit_event(SchedulerEvent::LastSyncUpdated { epoch_millis });
        Ok(())
    }

    async fn schedule_job(&self) -> Result<(), Error> {
        info!("Picture uploads sync job requested");
        self.emit_event(SchedulerEvent::JobRequested);
        Ok(())
    }
}
