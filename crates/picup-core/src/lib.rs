// # picup-core
//
// Configuration reconciliation for automatic picture uploads.
//
// ## Architecture Overview
//
// - **PreferenceStore**: Trait for the durable key-value settings
// - **AccountDirectory**: Trait for the active and known accounts
// - **SyncScheduler**: Trait for the sync watermark and upload job
// - **PictureUploadsReconciler**: Applies toggles and folder selections to
//   the settings and triggers the dependent side effects
// - **StoreRegistry**: Builds a preference store from configuration
//
// ## Design Principles
//
// 1. **Stateless core**: The reconciler derives every answer from the store
// 2. **Injected collaborators**: No ambient singletons; everything is passed in
// 3. **Silent tolerance**: Cancelled or malformed selections are no-ops
// 4. **Ordered side effects**: Compare against the old value, then write

pub mod accounts;
pub mod clock;
pub mod config;
pub mod error;
pub mod keys;
pub mod reconciler;
pub mod registry;
pub mod scheduler;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use accounts::StaticAccountDirectory;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{PictureUploadsConfig, StoreConfig, UploadBehaviour};
pub use error::{Error, Result};
pub use reconciler::{FolderSelection, PictureUploadsConfiguration, PictureUploadsReconciler};
pub use registry::StoreRegistry;
pub use scheduler::{PreferenceSyncScheduler, SchedulerEvent};
pub use store::{FilePreferenceStore, MemoryPreferenceStore};
pub use traits::{AccountDirectory, PreferenceStore, SyncScheduler};
