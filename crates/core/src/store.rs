//! Key-value store for client-side state
//!
//! Favorites and the sent-email log are persisted through the
//! [`KeyValueStore`] port rather than a process-wide global:
//! - [`MemoryStore`] for tests and ephemeral sessions
//! - [`FileStore`] persisting a single JSON document on disk
//!
//! # Example
//!
//! ```rust
//! use savemate_core::store::{KeyValueStore, KeyValueStoreExt, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.set_json("favorites", &vec!["deal-1"]).unwrap();
//!
//! let favorites: Option<Vec<String>> = store.get_json("favorites").unwrap();
//! assert_eq!(favorites, Some(vec!["deal-1".to_string()]));
//! ```

use crate::error::{Error, ErrorCode, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// String key-value storage port
pub trait KeyValueStore: Send + Sync {
    /// Read a raw value
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a raw value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value, returning whether it existed
    fn remove(&self, key: &str) -> Result<bool>;

    /// All keys in sorted order
    fn keys(&self) -> Result<Vec<String>>;
}

/// Typed JSON access on top of any [`KeyValueStore`]
pub trait KeyValueStoreExt: KeyValueStore {
    /// Read and deserialize a value
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| Error::storage_corrupted(key).with_source(e)),
            None => Ok(None),
        }
    }

    /// Serialize and write a value
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned() -> Error {
    Error::new(ErrorCode::Internal, "Store lock poisoned")
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(|_| lock_poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| lock_poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.write().map_err(|_| lock_poisoned())?;
        Ok(entries.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = self.entries.read().map_err(|_| lock_poisoned())?;
        Ok(entries.keys().cloned().collect())
    }
}

/// File-backed store: one JSON object holding every key
///
/// The whole document is rewritten on each change through a temp file and
/// a rename, so a crash never leaves a half-written store behind.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Default file name inside the data directory
    pub const FILE_NAME: &'static str = "client-state.json";

    /// Open (or create) the store file inside `dir`
    pub fn open_in(dir: impl AsRef<Path>) -> Result<Self> {
        Self::open(dir.as_ref().join(Self::FILE_NAME))
    }

    /// Open (or create) the store at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    Error::new(
                        ErrorCode::StorageCorrupted,
                        format!("Store file {} is not a JSON object", path.display()),
                    )
                    .with_suggestion("Delete the file to start with an empty store")
                    .with_source(e)
                })?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Location of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(|_| lock_poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| lock_poisoned())?;
        let mut staged = entries.clone();
        staged.insert(key.to_string(), value.to_string());
        self.flush(&staged)?;
        *entries = staged;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.write().map_err(|_| lock_poisoned())?;
        if !entries.contains_key(key) {
            return Ok(false);
        }
        let mut staged = entries.clone();
        staged.remove(key);
        self.flush(&staged)?;
        *entries = staged;
        Ok(true)
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = self.entries.read().map_err(|_| lock_poisoned())?;
        Ok(entries.keys().cloned().collect())
    }
}
