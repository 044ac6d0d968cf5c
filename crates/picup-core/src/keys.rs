//! Preference keys
//!
//! These identifiers are persisted. Renaming one requires a migration like
//! [`LEGACY_KEYS`] handles for the previous generation.

/// Master switch (bool)
pub const PICTURE_UPLOADS_ENABLED: &str = "camera_picture_uploads_enabled";

/// Bound account name (string)
pub const PICTURE_UPLOADS_ACCOUNT_NAME: &str = "camera_picture_uploads_account_name";

/// Remote target folder (string)
pub const PICTURE_UPLOADS_PATH: &str = "camera_picture_uploads_path";

/// Local source folder (string)
pub const PICTURE_UPLOADS_SOURCE_PATH: &str = "camera_picture_uploads_source_path";

/// Upload only over Wi-Fi (bool)
pub const PICTURE_UPLOADS_WIFI_ONLY: &str = "picture_uploads_on_wifi";

/// Post-upload handling of the local file (string, `NOTHING` or `MOVE`)
pub const PICTURE_UPLOADS_BEHAVIOUR: &str = "picture_uploads_behaviour";

/// Sync watermark (int, epoch millis). Owned by the sync scheduler.
pub const LAST_SYNC_TIMESTAMP: &str = "last_sync_timestamp";

/// Keys written by older releases that are no longer read
pub const LEGACY_KEYS: &[&str] = &[
    "camera_picture_uploads",
    "camera_picture_uploads_on_wifi",
    "camera_uploads_source_path",
    "camera_uploads_account_name",
    "camera_uploads_behaviour",
];
