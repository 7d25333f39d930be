//! Persistence backends for the saved drawing.

use crate::element::ElementCollection;
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
use std::fs;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

/// Key the board saves its drawing under.
pub const STORAGE_KEY: &str = "savedDrawing";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Key-value persistence for element collections.
///
/// Backends serialize to JSON so a drawing saved by one backend can be
/// loaded by another.
pub trait Storage: Send + Sync {
    /// Save a collection under a key, replacing any previous value.
    fn save(&self, key: &str, elements: &ElementCollection) -> StorageResult<()>;

    /// Load the collection stored under a key. Returns `Ok(None)` when
    /// the key has never been written or was cleared.
    fn load(&self, key: &str) -> StorageResult<Option<ElementCollection>>;

    /// Remove the value stored under a key. Removing a missing key is
    /// not an error.
    fn clear(&self, key: &str) -> StorageResult<()>;
}

impl<S: Storage + ?Sized> Storage for std::sync::Arc<S> {
    fn save(&self, key: &str, elements: &ElementCollection) -> StorageResult<()> {
        (**self).save(key, elements)
    }

    fn load(&self, key: &str) -> StorageResult<Option<ElementCollection>> {
        (**self).load(key)
    }

    fn clear(&self, key: &str) -> StorageResult<()> {
        (**self).clear(key)
    }
}

/// In-memory storage backend, primarily for tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw JSON payload, bypassing serialization. Lets tests
    /// exercise corrupt-data recovery.
    pub fn insert_raw(&self, key: &str, json: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), json.to_string());
        }
    }
}

impl Storage for MemoryStorage {
    fn save(&self, key: &str, elements: &ElementCollection) -> StorageResult<()> {
        let json = serde_json::to_string(elements)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StorageError::Other(format!("Lock poisoned: {}", e)))?;
        entries.insert(key.to_string(), json);
        Ok(())
    }

    fn load(&self, key: &str) -> StorageResult<Option<ElementCollection>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StorageError::Other(format!("Lock poisoned: {}", e)))?;
        match entries.get(key) {
            Some(json) => serde_json::from_str(json)
                .map(Some)
                .map_err(|e| StorageError::Serialization(e.to_string())),
            None => Ok(None),
        }
    }

    fn clear(&self, key: &str) -> StorageResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StorageError::Other(format!("Lock poisoned: {}", e)))?;
        entries.remove(key);
        Ok(())
    }
}

/// File-based storage for native platforms.
///
/// Stores each key as a JSON file in a base directory.
#[cfg(not(target_arch = "wasm32"))]
pub struct FileStorage {
    base_path: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default location under the platform's
    /// local data directory.
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("inkpad"))
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        // Sanitize key to be safe for filenames
        let safe_key: String = key
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_path.join(format!("{}.json", safe_key))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Storage for FileStorage {
    fn save(&self, key: &str, elements: &ElementCollection) -> StorageResult<()> {
        let json = serde_json::to_string(elements)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let path = self.entry_path(key);
        fs::write(&path, json)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    fn load(&self, key: &str) -> StorageResult<Option<ElementCollection>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| StorageError::Serialization(format!("{}: {}", path.display(), e)))
    }

    fn clear(&self, key: &str) -> StorageResult<()> {
        let path = self.entry_path(key);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
            })?;
        }
        Ok(())
    }
}
