//! Durable key-value storage
//!
//! The browser-profile analog: small string values under string keys,
//! surviving process restarts. The auth token and the persisted
//! model-selection slice live here.

use crate::error::{Error, Result};
use crate::sync::RwLockExt;
use log::{debug, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Trait for durable key-value storage backends
///
/// The contract is deliberately getItem/setItem-shaped: string values under
/// string keys, unconditional replace on set.
pub trait DurableStore: Send + Sync {
    /// Read a value, `None` when the key was never set
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to persist.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to persist.
    fn remove(&self, key: &str) -> Result<()>;
}

// =============================================================================
// JSON File Store
// =============================================================================

/// File-backed store: one JSON object, written atomically on every change
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Open (or create) a store at the given file path
    ///
    /// A missing file starts empty; a corrupt file is discarded with a
    /// warning rather than failing construction.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, String>>(&content) {
                Ok(map) => map,
                Err(e) => {
                    warn!("Discarding corrupt durable store at {}: {e}", path.display());
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(Error::FileRead {
                    path: path.clone(),
                    source: e,
                });
            }
        };

        debug!(
            "Opened durable store at {} ({} entries)",
            path.display(),
            entries.len()
        );
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Open the default store for an app: `<config dir>/<app>/state.json`
    ///
    /// # Errors
    ///
    /// Returns an error if an existing state file cannot be read.
    pub fn for_app(app_name: &str) -> Result<Self> {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::open(base.join(app_name).join("state.json"))
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomic write: temp file + rename, so a crash never truncates state
    fn flush(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let content = serde_json::to_string_pretty(entries)?;
        let file_name = self.path.file_name().ok_or_else(|| {
            Error::Config(format!(
                "Invalid store path '{}': must have a filename",
                self.path.display()
            ))
        })?;
        let mut temp_filename = file_name.to_os_string();
        temp_filename.push(".tmp");
        let temp_path = self.path.with_file_name(temp_filename);

        std::fs::write(&temp_path, &content).map_err(|e| Error::FileWrite {
            path: temp_path.clone(),
            source: e,
        })?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| Error::FileWrite {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl DurableStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read_recovered()?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write_recovered()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write_recovered()?;
        if entries.remove(key).is_some() {
            return self.flush(&entries);
        }
        Ok(())
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-memory store (not persisted), for tests and ephemeral sessions
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read_recovered()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write_recovered()?
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write_recovered()?.remove(key);
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = JsonFileStore::open(&path).unwrap();
        store.set("console.auth-token", "abc123").unwrap();
        assert_eq!(
            store.get("console.auth-token").unwrap(),
            Some("abc123".to_string())
        );

        // Reopen from disk
        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("console.auth-token").unwrap(),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_file_store_remove() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("state.json")).unwrap();

        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);

        // Removing a missing key is fine
        store.remove("k").unwrap();
    }

    #[test]
    fn test_file_store_corrupt_file_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn test_file_store_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/state.json");

        let store = JsonFileStore::open(&path).unwrap();
        store.set("k", "v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_memory_store_replace_semantics() {
        let store = MemoryStore::new();
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("two".to_string()));
    }
}
