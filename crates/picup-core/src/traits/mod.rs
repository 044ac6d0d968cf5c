//! Collaborator traits for picture upload configuration
//!
//! The reconciler only ever talks to these interfaces:
//!
//! - [`PreferenceStore`]: Durable key-value settings
//! - [`AccountDirectory`]: Active and known accounts
//! - [`SyncScheduler`]: Sync watermark and upload job scheduling

pub mod account_directory;
pub mod preference_store;
pub mod sync_scheduler;

pub use account_directory::AccountDirectory;
pub use preference_store::{PreferenceStore, PreferenceStoreFactory, PreferenceValue};
pub use sync_scheduler::{NEVER_SYNCED, SyncScheduler};
