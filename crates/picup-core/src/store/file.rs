// # File Preference Store
//
// File-based implementation of PreferenceStore with crash recovery.
//
// ## Purpose
//
// Keeps picture upload settings across restarts. Every mutation is written
// through before the call returns, so a crash loses at most the write that
// was in flight.
//
// ## Crash Recovery
//
// - Atomic writes: write-then-rename
// - Automatic backup: `.backup` holds the previous good file
// - Recovery: falls back to the backup when the main file fails to parse
//
// ## File Format
//
// ```json
// {
//   "version": "1.0",
//   "preferences": {
//     "camera_picture_uploads_enabled": { "type": "bool", "value": true },
//     "camera_picture_uploads_path": { "type": "string", "value": "/CameraUpload" },
//     "last_sync_timestamp": { "type": "int", "value": 0 }
//   }
// }
// ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::Error;
use crate::config::StoreConfig;
use crate::traits::preference_store::{PreferenceStore, PreferenceStoreFactory, PreferenceValue};

/// Preferences file format version
const PREFERENCES_FILE_VERSION: &str = "1.0";

/// File-based preference store with crash recovery
///
/// # Example
///
/// ```rust,no_run
/// use picup_core::store::FilePreferenceStore;
/// use picup_core::traits::PreferenceStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FilePreferenceStore::new("/var/lib/picup/preferences.json").await?;
///
///     // Atomically written to disk
///     store.put_bool("camera_picture_uploads_enabled", true).await?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    preferences: Arc<RwLock<HashMap<String, PreferenceValue>>>,
}

/// Serializable preferences file format
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct PreferencesFileFormat {
    version: String,
    preferences: HashMap<String, PreferenceValue>,
}

impl FilePreferenceStore {
    /// Create or load a file preference store
    ///
    /// This will:
    /// 1. Create parent directories if needed
    /// 2. Load the existing file
    /// 3. If it is corrupted, load the backup instead
    /// 4. If both fail, start empty
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::config(format!(
                    "Failed to create preferences directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let preferences = Self::load_with_recovery(&path).await?;

        Ok(Self {
            path,
            preferences: Arc::new(RwLock::new(preferences)),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_with_recovery(path: &Path) -> Result<HashMap<String, PreferenceValue>, Error> {
        match Self::load(path).await {
            Ok(preferences) => {
                tracing::debug!("Loaded {} preference(s) from file", preferences.len());
                Ok(preferences)
            }
            Err(LoadError::Corrupted(e)) => {
                tracing::warn!(
                    "Preferences file appears corrupted: {}. Attempting recovery from backup.",
                    e
                );

                let backup_path = Self::backup_path(path);
                if !backup_path.exists() {
                    tracing::warn!("No backup file found. Starting with empty preferences.");
                    return Ok(HashMap::new());
                }

                match Self::load(&backup_path).await {
                    Ok(preferences) => {
                        tracing::info!(
                            "Recovered {} preference(s) from backup",
                            preferences.len()
                        );

                        if let Err(restore_err) = fs::copy(&backup_path, path).await {
                            tracing::error!(
                                "Failed to restore preferences file from backup: {}",
                                restore_err
                            );
                        }

                        Ok(preferences)
                    }
                    Err(backup_err) => {
                        tracing::error!(
                            "Backup also unreadable: {}. Starting with empty preferences.",
                            backup_err
                        );
                        Ok(HashMap::new())
                    }
                }
            }
            Err(LoadError::Fatal(e)) => Err(e),
        }
    }

    async fn load(path: &Path) -> Result<HashMap<String, PreferenceValue>, LoadError> {
        if !path.exists() {
            tracing::debug!("Preferences file does not exist: {}", path.display());
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            LoadError::Fatal(Error::preference_store(format!(
                "Failed to read preferences file {}: {}",
                path.display(),
                e
            )))
        })?;

        let file: PreferencesFileFormat = serde_json::from_str(&content).map_err(|e| {
            LoadError::Corrupted(Error::preference_store(format!(
                "Failed to parse preferences file {}: {}",
                path.display(),
                e
            )))
        })?;

        if file.version != PREFERENCES_FILE_VERSION {
            tracing::warn!(
                "Preferences file version mismatch: expected {}, got {}. Loading anyway.",
                PREFERENCES_FILE_VERSION,
                file.version
            );
        }

        Ok(file.preferences)
    }

    /// Write `preferences` to disk atomically
    async fn write(&self, preferences: &HashMap<String, PreferenceValue>) -> Result<(), Error> {
        let file = PreferencesFileFormat {
            version: PREFERENCES_FILE_VERSION.to_string(),
            preferences: preferences.clone(),
        };

        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| Error::preference_store(format!("Failed to serialize preferences: {e}")))?;

        let temp_path = self.temp_path();
        {
            let mut temp = fs::File::create(&temp_path).await.map_err(|e| {
                Error::preference_store(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            temp.write_all(json.as_bytes()).await.map_err(|e| {
                Error::preference_store(format!(
                    "Failed to write temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            temp.flush().await.map_err(|e| {
                Error::preference_store(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        if self.path.exists()
            && let Err(e) = fs::copy(&self.path, Self::backup_path(&self.path)).await
        {
            tracing::warn!("Failed to create backup: {}", e);
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::preference_store(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("Preferences written to {}", self.path.display());
        Ok(())
    }

    /// Apply `f` to a copy of the preferences and publish it once on disk
    ///
    /// A failed write leaves both the file and the in-memory view untouched.
    async fn mutate(
        &self,
        f: impl FnOnce(&mut HashMap<String, PreferenceValue>),
    ) -> Result<(), Error> {
        let mut guard = self.preferences.write().await;
        let mut next = guard.clone();
        f(&mut next);

        self.write(&next).await?;
        *guard = next;
        Ok(())
    }

    async fn read<T>(&self, key: &str, f: impl FnOnce(Option<&PreferenceValue>) -> T) -> T {
        let guard = self.preferences.read().await;
        f(guard.get(key))
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }

    fn backup_path(path: &Path) -> PathBuf {
        let mut backup = path.to_path_buf();
        backup.set_extension("backup");
        backup
    }
}

/// Distinguishes recoverable parse failures from I/O failures
enum LoadError {
    Corrupted(Error),
    Fatal(Error),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Corrupted(e) | LoadError::Fatal(e) => write!(f, "{e}"),
        }
    }
}

#[async_trait]
impl PreferenceStore for FilePreferenceStore {
    async fn get_bool(&self, key: &str, default: bool) -> Result<bool, Error> {
        Ok(self
            .read(key, |v| v.and_then(PreferenceValue::as_bool))
            .await
            .unwrap_or(default))
    }

    async fn get_string(&self, key: &str, default: Option<&str>) -> Result<Option<String>, Error> {
        let stored = self
            .read(key, |v| v.and_then(PreferenceValue::as_str).map(str::to_string))
            .await;
        Ok(stored.or_else(|| default.map(str::to_string)))
    }

    async fn get_i64(&self, key: &str, default: i64) -> Result<i64, Error> {
        Ok(self
            .read(key, |v| v.and_then(PreferenceValue::as_i64))
            .await
            .unwrap_or(default))
    }

    async fn put_bool(&self, key: &str, value: bool) -> Result<(), Error> {
        self.mutate(|prefs| {
            prefs.insert(key.to_string(), PreferenceValue::Bool(value));
        })
        .await
    }

    async fn put_string(&self, key: &str, value: &str) -> Result<(), Error> {
        self.mutate(|prefs| {
            prefs.insert(key.to_string(), PreferenceValue::String(value.to_string()));
        })
        .await
    }

    async fn put_i64(&self, key: &str, value: i64) -> Result<(), Error> {
        self.mutate(|prefs| {
            prefs.insert(key.to_string(), PreferenceValue::Int(value));
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<(), Error> {
        if !self.contains(key).await? {
            return Ok(());
        }
        self.mutate(|prefs| {
            prefs.remove(key);
        })
        .await
    }

    async fn contains(&self, key: &str) -> Result<bool, Error> {
        Ok(self.read(key, |v| v.is_some()).await)
    }

    async fn keys(&self) -> Result<Vec<String>, Error> {
        let guard = self.preferences.read().await;
        Ok(guard.keys().cloned().collect())
    }

    async fn flush(&self) -> Result<(), Error> {
        // Every mutation is written through
        Ok(())
    }
}

/// Factory for `StoreConfig::File`
#[derive(Debug, Default, Clone, Copy)]
pub struct FilePreferenceStoreFactory;

#[async_trait]
impl PreferenceStoreFactory for FilePreferenceStoreFactory {
    async fn create(&self, config: &serde_json::Value) -> Result<Box<dyn PreferenceStore>, Error> {
        match serde_json::from_value::<StoreConfig>(config.clone())? {
            StoreConfig::File { path } => Ok(Box::new(FilePreferenceStore::new(path).await?)),
            other => Err(Error::config(format!(
                "File store factory cannot build a '{}' store",
                other.type_name()
            ))),
        }
    }
}
