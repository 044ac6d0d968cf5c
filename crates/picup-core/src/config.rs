//! Configuration types for picture uploads
//!
//! Defaults here are what the reconciler reports for paths the user never
//! picked. They are configuration, not stored preferences.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default remote folder for uploaded pictures
pub const DEFAULT_REMOTE_PATH: &str = "/CameraUpload";

/// Default local camera folder
pub const DEFAULT_SOURCE_PATH: &str = "/sdcard/DCIM/Camera";

/// Main picture uploads configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureUploadsConfig {
    /// Remote folder reported when none has been selected
    #[serde(default = "default_remote_path")]
    pub default_remote_path: String,

    /// Local folder reported when none has been selected
    #[serde(default = "default_source_path")]
    pub default_source_path: String,

    /// Wi-Fi only flag reported when none has been stored
    #[serde(default)]
    pub default_wifi_only: bool,

    /// Post-upload handling reported when none has been stored
    #[serde(default)]
    pub default_behaviour: UploadBehaviour,

    /// Separator used when normalizing paths
    #[serde(default = "default_path_separator")]
    pub path_separator: char,

    /// Preference store backing the settings
    #[serde(default)]
    pub store: StoreConfig,
}

impl PictureUploadsConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            default_remote_path: default_remote_path(),
            default_source_path: default_source_path(),
            default_wifi_only: false,
            default_behaviour: UploadBehaviour::default(),
            path_separator: default_path_separator(),
            store: StoreConfig::default(),
        }
    }

    /// Set the default remote path
    pub fn with_default_remote_path(mut self, path: impl Into<String>) -> Self {
        self.default_remote_path = path.into();
        self
    }

    /// Set the default source path
    pub fn with_default_source_path(mut self, path: impl Into<String>) -> Self {
        self.default_source_path = path.into();
        self
    }

    /// Set whether uploads wait for Wi-Fi unless told otherwise
    pub fn with_default_wifi_only(mut self, wifi_only: bool) -> Self {
        self.default_wifi_only = wifi_only;
        self
    }

    /// Set the post-upload handling used unless told otherwise
    pub fn with_default_behaviour(mut self, behaviour: UploadBehaviour) -> Self {
        self.default_behaviour = behaviour;
        self
    }

    /// Set the store configuration
    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.default_remote_path.is_empty() {
            return Err(crate::Error::config("Default remote path cannot be empty"));
        }
        if !self.default_remote_path.starts_with(self.path_separator) {
            return Err(crate::Error::config(format!(
                "Default remote path must be absolute (start with '{}'): {}",
                self.path_separator, self.default_remote_path
            )));
        }
        if self.default_source_path.is_empty() {
            return Err(crate::Error::config("Default source path cannot be empty"));
        }

        self.store.validate()
    }
}

impl Default for PictureUploadsConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// What happens to a local picture once it has been uploaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadBehaviour {
    /// Leave the local file where it is
    #[default]
    Keep,
    /// Move the local file into the app's storage
    Move,
}

impl UploadBehaviour {
    /// Decode a stored value. Only `MOVE`, in any case, means [`Move`](Self::Move).
    pub fn from_stored(value: &str) -> Self {
        if value.eq_ignore_ascii_case("MOVE") {
            Self::Move
        } else {
            Self::Keep
        }
    }

    /// The value written to the preference store
    pub fn as_stored(&self) -> &'static str {
        match self {
            Self::Keep => "NOTHING",
            Self::Move => "MOVE",
        }
    }
}

impl fmt::Display for UploadBehaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keep => f.write_str("keep"),
            Self::Move => f.write_str("move"),
        }
    }
}

impl FromStr for UploadBehaviour {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keep" | "nothing" => Ok(Self::Keep),
            "move" => Ok(Self::Move),
            other => Err(crate::Error::invalid_input(format!(
                "Unknown upload behaviour '{other}', expected 'keep' or 'move'"
            ))),
        }
    }
}

/// Preference store configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// JSON file store
    File {
        /// Path to the preferences file
        path: String,
    },

    /// In-memory store (not persistent)
    #[default]
    Memory,

    /// Custom store
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl StoreConfig {
    /// Get the store type name used for registry lookup
    pub fn type_name(&self) -> &str {
        match self {
            StoreConfig::File { .. } => "file",
            StoreConfig::Memory => "memory",
            StoreConfig::Custom { factory, .. } => factory,
        }
    }

    /// Validate the store configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            StoreConfig::File { path } if path.is_empty() => {
                Err(crate::Error::config("File store path cannot be empty"))
            }
            StoreConfig::Custom { factory, .. } if factory.is_empty() => {
                Err(crate::Error::config("Custom store factory cannot be empty"))
            }
            _ => Ok(()),
        }
    }
}

fn default_remote_path() -> String {
    DEFAULT_REMOTE_PATH.to_string()
}

fn default_source_path() -> String {
    DEFAULT_SOURCE_PATH.to_string()
}

fn default_path_separator() -> char {
    '/'
}
