//! Picture upload configuration reconciler
//!
//! The reconciler is responsible for:
//! - Toggling the feature and binding it to the active account
//! - Clearing stale bindings when the feature is disabled
//! - Recording remote and local folder selections
//! - Resetting the sync watermark when the local folder changes
//! - Recording upload conditions and post-upload handling
//! - Forwarding job scheduling requests
//!
//! ## Architecture
//!
//! ```text
//!                       ┌──────────────────────────┐
//!    UI request ───────▶│ PictureUploadsReconciler │
//!                       └──────────────────────────┘
//!                                    │
//!         ┌──────────────────────────┼──────────────────────────┐
//!         │                          │                          │
//!         ▼                          ▼                          ▼
//! ┌─────────────────┐      ┌──────────────────┐      ┌─────────────────┐
//! │ PreferenceStore │      │ AccountDirectory │      │  SyncScheduler  │
//! │  (read/write)   │      │     (read)       │      │ (watermark/job) │
//! └─────────────────┘      └──────────────────┘      └─────────────────┘
//! ```
//!
//! The reconciler holds no mutable state. Every answer is derived from the
//! store at call time, and every mutation is a sequence of single-key writes.
//! Configuration problems never surface as errors; only collaborator faults
//! are propagated.

pub mod selection;

pub use selection::FolderSelection;

use std::sync::Arc;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::config::{PictureUploadsConfig, UploadBehaviour};
use crate::error::Result;
use crate::keys;
use crate::traits::{AccountDirectory, NEVER_SYNCED, PreferenceStore, SyncScheduler};

/// Snapshot of the settings an upload job runs with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureUploadsConfiguration {
    /// Whether picture uploads are on
    pub enabled: bool,
    /// Account the uploads go to, if bound
    pub account_name: Option<String>,
    /// Remote folder, always ending with the path separator
    pub upload_path: String,
    /// Local folder scanned for new pictures
    pub source_path: String,
    /// Whether uploads wait for a Wi-Fi connection
    pub wifi_only: bool,
    /// What happens to the local file after upload
    pub behaviour: UploadBehaviour,
}

/// Reconciles picture upload settings against their preference entries
pub struct PictureUploadsReconciler {
    store: Arc<dyn PreferenceStore>,
    accounts: Arc<dyn AccountDirectory>,
    scheduler: Arc<dyn SyncScheduler>,
    clock: Arc<dyn Clock>,
    config: PictureUploadsConfig,
}

impl PictureUploadsReconciler {
    /// Create a new reconciler
    ///
    /// # Errors
    ///
    /// `Error::Config` if `config` fails validation.
    pub fn new(
        store: Arc<dyn PreferenceStore>,
        accounts: Arc<dyn AccountDirectory>,
        scheduler: Arc<dyn SyncScheduler>,
        config: PictureUploadsConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            store,
            accounts,
            scheduler,
            clock: Arc::new(SystemClock),
            config,
        })
    }

    /// Replace the wall clock used for watermark resets
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The configuration this reconciler was built with
    pub fn config(&self) -> &PictureUploadsConfig {
        &self.config
    }

    /// Whether picture uploads are enabled (false if never set)
    pub async fn is_enabled(&self) -> Result<bool> {
        self.store.get_bool(keys::PICTURE_UPLOADS_ENABLED, false).await
    }

    /// Turn picture uploads on or off
    ///
    /// Enabling binds the feature to the active account when there is one.
    /// With no account attached the binding stays unset; the caller is
    /// expected to hide the switch in that case.
    ///
    /// Disabling removes the remote path and the bound account.
    ///
    /// The flag is written first, side effects second.
    pub async fn set_enabled(&self, value: bool) -> Result<()> {
        self.store
            .put_bool(keys::PICTURE_UPLOADS_ENABLED, value)
            .await?;

        if value {
            match self.accounts.current_account_name().await? {
                Some(name) => {
                    self.store
                        .put_string(keys::PICTURE_UPLOADS_ACCOUNT_NAME, &name)
                        .await?;
                    info!("Picture uploads enabled for account {}", name);
                }
                None => {
                    info!("Picture uploads enabled with no account attached");
                }
            }
        } else {
            self.store.remove(keys::PICTURE_UPLOADS_PATH).await?;
            self.store.remove(keys::PICTURE_UPLOADS_ACCOUNT_NAME).await?;
            info!("Picture uploads disabled, account and remote path cleared");
        }

        Ok(())
    }

    /// The account picture uploads are bound to, if any
    pub async fn bound_account_name(&self) -> Result<Option<String>> {
        self.store
            .get_string(keys::PICTURE_UPLOADS_ACCOUNT_NAME, None)
            .await
    }

    /// All known accounts, in directory order
    pub async fn known_account_names(&self) -> Result<Vec<String>> {
        self.accounts.all_account_names().await
    }

    /// Remote upload folder, or the configured default
    pub async fn remote_path(&self) -> Result<String> {
        self.string_or_default(keys::PICTURE_UPLOADS_PATH, &self.config.default_remote_path)
            .await
    }

    /// Local source folder, or the configured default
    pub async fn source_path(&self) -> Result<String> {
        self.string_or_default(
            keys::PICTURE_UPLOADS_SOURCE_PATH,
            &self.config.default_source_path,
        )
        .await
    }

    /// Whether uploads wait for Wi-Fi, or the configured default
    pub async fn is_wifi_only(&self) -> Result<bool> {
        self.store
            .get_bool(keys::PICTURE_UPLOADS_WIFI_ONLY, self.config.default_wifi_only)
            .await
    }

    /// Restrict uploads to Wi-Fi, or allow any connection
    pub async fn set_wifi_only(&self, value: bool) -> Result<()> {
        self.store
            .put_bool(keys::PICTURE_UPLOADS_WIFI_ONLY, value)
            .await?;
        info!("Picture uploads Wi-Fi only set to {}", value);
        Ok(())
    }

    /// Post-upload handling of local files, or the configured default
    ///
    /// Any stored value other than `MOVE` (case-insensitive) means keep.
    pub async fn behaviour_after_upload(&self) -> Result<UploadBehaviour> {
        Ok(self
            .store
            .get_string(keys::PICTURE_UPLOADS_BEHAVIOUR, None)
            .await?
            .map(|stored| UploadBehaviour::from_stored(&stored))
            .unwrap_or(self.config.default_behaviour))
    }

    /// Choose what happens to local files once uploaded
    pub async fn set_behaviour_after_upload(&self, behaviour: UploadBehaviour) -> Result<()> {
        self.store
            .put_string(keys::PICTURE_UPLOADS_BEHAVIOUR, behaviour.as_stored())
            .await?;
        info!("Picture uploads behaviour after upload set to {}", behaviour);
        Ok(())
    }

    /// Store the remote folder picked by the user
    ///
    /// A cancelled picker, or a result without a non-empty path, changes
    /// nothing.
    pub async fn apply_selected_remote_path(
        &self,
        selection: Option<&FolderSelection>,
    ) -> Result<()> {
        let Some(path) = selection
            .and_then(FolderSelection::path)
            .filter(|path| !path.is_empty())
        else {
            debug!("No remote folder selected, keeping current upload path");
            return Ok(());
        };

        self.store
            .put_string(keys::PICTURE_UPLOADS_PATH, path)
            .await?;
        info!("Picture uploads remote path set to {}", path);
        Ok(())
    }

    /// Store the local folder picked by the user
    ///
    /// The stored folder, minus one trailing separator, is compared against
    /// the selected path exactly as given. Any difference, including a
    /// missing selection, moves the watermark to now so files already in the
    /// folder are not uploaded. The comparison must use the old folder, so
    /// it runs before the new path is written.
    pub async fn apply_selected_source_path(
        &self,
        selection: Option<&FolderSelection>,
    ) -> Result<()> {
        let previous = self.source_path().await?;
        let previous = previous
            .strip_suffix(self.config.path_separator)
            .unwrap_or(&previous);

        let selected = selection.and_then(FolderSelection::path);

        if selected == Some(previous) {
            debug!("Picture uploads source folder unchanged: {}", previous);
        } else {
            let now = self.clock.now_millis();
            self.scheduler.set_last_sync_timestamp(now).await?;
            info!(
                "Picture uploads source folder changed from {}, last sync moved to {}",
                previous, now
            );
        }

        if let Some(path) = selected {
            self.store
                .put_string(keys::PICTURE_UPLOADS_SOURCE_PATH, path)
                .await?;
            info!("Picture uploads source path set to {}", path);
        }

        Ok(())
    }

    /// Force a full rescan on the next sync
    pub async fn reset_last_sync(&self) -> Result<()> {
        info!("Resetting picture uploads last sync");
        self.scheduler.set_last_sync_timestamp(NEVER_SYNCED).await
    }

    /// Ask the scheduler to run the upload job
    pub async fn schedule_sync_job(&self) -> Result<()> {
        self.scheduler.schedule_job().await
    }

    /// Read every setting the upload job needs in one snapshot
    ///
    /// Reads are independent, so a concurrent writer may be observed halfway.
    pub async fn configuration(&self) -> Result<PictureUploadsConfiguration> {
        let enabled = self.is_enabled().await?;
        let account_name = self.bound_account_name().await?;

        let separator = self.config.path_separator;
        let mut upload_path = self.remote_path().await?;
        if !upload_path.ends_with(separator) {
            upload_path.push(separator);
        }

        let source_path = self.source_path().await?;
        let wifi_only = self.is_wifi_only().await?;
        let behaviour = self.behaviour_after_upload().await?;

        Ok(PictureUploadsConfiguration {
            enabled,
            account_name,
            upload_path,
            source_path,
            wifi_only,
            behaviour,
        })
    }

    /// Remove keys left behind by releases before the current key names
    ///
    /// # Returns
    ///
    /// The number of keys removed.
    pub async fn purge_legacy_preferences(&self) -> Result<usize> {
        let mut removed = 0;
        for key in keys::LEGACY_KEYS {
            if self.store.contains(key).await? {
                self.store.remove(key).await?;
                removed += 1;
            }
        }

        if removed > 0 {
            info!("Removed {} legacy picture upload preference(s)", removed);
        }
        Ok(removed)
    }

    async fn string_or_default(&self, key: &str, default: &str) -> Result<String> {
        Ok(self
            .store
            .get_string(key, Some(default))
            .await?
            .unwrap_or_else(|| default.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::StaticAccountDirectory;
    use crate::clock::FixedClock;
    use crate::scheduler::{PreferenceSyncScheduler, SchedulerEvent};
    use crate::store::MemoryPreferenceStore;
    use tokio::sync::mpsc;

    fn reconciler(
        accounts: StaticAccountDirectory,
    ) -> (
        PictureUploadsReconciler,
        MemoryPreferenceStore,
        mpsc::Receiver<SchedulerEvent>,
    ) {
        let store = MemoryPreferenceStore::new();
        let (scheduler, events) = PreferenceSyncScheduler::new(Arc::new(store.clone()), 16);
        let reconciler = PictureUploadsReconciler::new(
            Arc::new(store.clone()),
            Arc::new(accounts),
            Arc::new(scheduler),
            PictureUploadsConfig::default(),
        )
        .unwrap()
        .with_clock(Arc::new(FixedClock(1_000)));
        (reconciler, store, events)
    }

    #[tokio::test]
    async fn test_fresh_store_reports_defaults() {
        let (reconciler, _store, _events) = reconciler(StaticAccountDirectory::new());

        assert!(!reconciler.is_enabled().await.unwrap());
        assert_eq!(reconciler.bound_account_name().await.unwrap(), None);
        assert_eq!(reconciler.remote_path().await.unwrap(), "/CameraUpload");
        assert_eq!(reconciler.source_path().await.unwrap(), "/sdcard/DCIM/Camera");
    }

    #[tokio::test]
    async fn test_configuration_snapshot_appends_separator() {
        let (reconciler, store, _events) =
            reconciler(StaticAccountDirectory::with_accounts(["alice"]));
        reconciler.set_enabled(true).await.unwrap();
        store
            .put_string(keys::PICTURE_UPLOADS_PATH, "/Photos/")
            .await
            .unwrap();

        let snapshot = reconciler.configuration().await.unwrap();
        assert_eq!(
            snapshot,
            PictureUploadsConfiguration {
                enabled: true,
                account_name: Some("alice".to_string()),
                upload_path: "/Photos/".to_string(),
                source_path: "/sdcard/DCIM/Camera".to_string(),
                wifi_only: false,
                behaviour: UploadBehaviour::Keep,
            }
        );

        reconciler.set_enabled(false).await.unwrap();
        let snapshot = reconciler.configuration().await.unwrap();
        assert_eq!(snapshot.upload_path, "/CameraUpload/");
        assert_eq!(snapshot.account_name, None);
    }

    #[tokio::test]
    async fn test_schedule_sync_job_reaches_scheduler() {
        let (reconciler, _store, mut events) = reconciler(StaticAccountDirectory::new());

        reconciler.schedule_sync_job().await.unwrap();

        assert_eq!(events.recv().await, Some(SchedulerEvent::JobRequested));
    }

    #[tokio::test]
    async fn test_purge_legacy_preferences() {
        let (reconciler, store, _events) = reconciler(StaticAccountDirectory::new());
        store.put_bool("camera_picture_uploads", true).await.unwrap();
        store
            .put_string("camera_uploads_source_path", "/old")
            .await
            .unwrap();
        store
            .put_string(keys::PICTURE_UPLOADS_PATH, "/Photos")
            .await
            .unwrap();

        assert_eq!(reconciler.purge_legacy_preferences().await.unwrap(), 2);
        assert_eq!(reconciler.purge_legacy_preferences().await.unwrap(), 0);
        assert_eq!(reconciler.remote_path().await.unwrap(), "/Photos");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let store = Arc::new(MemoryPreferenceStore::new());
        let (scheduler, _events) = PreferenceSyncScheduler::new(store.clone(), 1);
        let result = PictureUploadsReconciler::new(
            store,
            Arc::new(StaticAccountDirectory::new()),
            Arc::new(scheduler),
            PictureUploadsConfig::new().with_default_remote_path(""),
        );
        assert!(result.is_err());
    }
}
