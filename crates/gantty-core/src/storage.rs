//! Key-value persistence for rows and chart settings.
//!
//! Storage is a stringly keyed and valued collaborator behind the
//! [`KvStore`] trait. Production uses [`FileStore`], one file per key
//! under the data directory, written atomically; tests and ephemeral
//! sessions use [`MemoryStore`]. The typed [`DataStore`] adapter on top
//! owns the documented key set and value shapes.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::chart::ChartSettings;
use crate::rows::TimelineRow;

/// Stored keys. These names and their value shapes are the external
/// interface; data written by one version must load in another.
pub const KEY_INPUT_ROWS: &str = "inputRows";
pub const KEY_CHART_TITLE: &str = "chartTitle";
pub const KEY_CHART_HEIGHT: &str = "chartHeight";
pub const KEY_CHART_WIDTH: &str = "chartWidth";

/// Error type for storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored rows are not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Failed to serialize rows: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// The storage collaborator: get, set, remove, nothing else.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// File-backed store, one file per key under a base directory.
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `base_path`, creating the directory if
    /// it does not exist.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.base_path.join(key))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.key_path(key)?;
        atomic_write(&path, value.as_bytes())?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.key_path(key)?;
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Validate a storage key for filesystem safety.
fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("key cannot be empty".to_string()));
    }

    for ch in key.chars() {
        if !ch.is_ascii_alphanumeric() && ch != '-' && ch != '_' {
            return Err(StorageError::InvalidKey(format!(
                "key contains invalid character: {ch}"
            )));
        }
    }

    Ok(())
}

/// Write `content` through a temp file, fsync, and rename onto `path`.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    // Unique temp filename from timestamp and process ID
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let pid = std::process::id();

    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("file");
    let tmp_name = format!("{file_name}.{timestamp}.{pid}.tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let result = (|| {
        let mut file = File::create(&tmp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    })();

    if result.is_err() {
        // Leave no temp file behind on failure
        let _ = fs::remove_file(&tmp_path);
    }

    result
}

/// Typed persistence over a raw key-value store.
///
/// Rows serialize as a JSON array under `inputRows`; title, height, and
/// width are stored as plain strings under their own keys. Palette and
/// label visibility are per-session and have no keys.
pub struct DataStore<S> {
    kv: S,
}

impl<S: KvStore> DataStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Persist the whole row list.
    pub fn save_rows(&mut self, rows: &[TimelineRow]) -> Result<(), StorageError> {
        let json = serde_json::to_string(rows).map_err(StorageError::Serialize)?;
        self.kv.set(KEY_INPUT_ROWS, &json)
    }

    /// Load the stored row list. `Ok(None)` when nothing was ever saved;
    /// rows stored without some fields load with those fields empty.
    pub fn load_rows(&self) -> Result<Option<Vec<TimelineRow>>, StorageError> {
        match self.kv.get(KEY_INPUT_ROWS)? {
            Some(json) => {
                let rows = serde_json::from_str(&json).map_err(StorageError::Parse)?;
                Ok(Some(rows))
            }
            None => Ok(None),
        }
    }

    /// Persist title, height, and width.
    pub fn save_settings(&mut self, settings: &ChartSettings) -> Result<(), StorageError> {
        self.kv.set(KEY_CHART_TITLE, &settings.title)?;
        self.kv.set(KEY_CHART_HEIGHT, &settings.height)?;
        self.kv.set(KEY_CHART_WIDTH, &settings.width)?;
        Ok(())
    }

    /// Load settings; every absent key silently takes its default, so a
    /// fresh store yields exactly the default settings.
    pub fn load_settings(&self) -> Result<ChartSettings, StorageError> {
        let defaults = ChartSettings::default();
        Ok(ChartSettings {
            title: self.load_or(KEY_CHART_TITLE, defaults.title)?,
            height: self.load_or(KEY_CHART_HEIGHT, defaults.height)?,
            width: self.load_or(KEY_CHART_WIDTH, defaults.width)?,
            palette: defaults.palette,
            show_labels: defaults.show_labels,
        })
    }

    fn load_or(&self, key: &str, default: String) -> Result<String, StorageError> {
        match self.kv.get(key)? {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Ok(default),
        }
    }

    pub fn clear_rows(&mut self) -> Result<(), StorageError> {
        self.kv.remove(KEY_INPUT_ROWS)
    }

    pub fn clear_settings(&mut self) -> Result<(), StorageError> {
        self.kv.remove(KEY_CHART_TITLE)?;
        self.kv.remove(KEY_CHART_HEIGHT)?;
        self.kv.remove(KEY_CHART_WIDTH)?;
        Ok(())
    }

    pub fn clear_all(&mut self) -> Result<(), StorageError> {
        self.clear_rows()?;
        self.clear_settings()
    }
}
