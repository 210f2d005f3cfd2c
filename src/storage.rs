//! Key/value persistence port.
//!
//! Components that persist state take a [`Storage`] implementation as a
//! constructor argument instead of reaching for a process-wide backend.
//! Keys map to small JSON documents; a missing or unreadable key reads
//! as [`None`] and the caller decides what to do about it.
//!
//! Two implementations ship with the crate: [`MemoryStorage`] for tests
//! and ephemeral sessions, and [`FileStorage`] which keeps one file per
//! key under a directory.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while persisting a value.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Writing the backing file failed.
    #[error("failed to write key {key:?}")]
    Write {
        /// The key being written.
        key: String,
        /// The underlying filesystem error.
        #[source]
        source: io::Error,
    },
    /// The storage directory could not be created.
    #[error("failed to create storage directory {dir:?}")]
    CreateDir {
        /// The directory being created.
        dir: PathBuf,
        /// The underlying filesystem error.
        #[source]
        source: io::Error,
    },
}

/// String key/value store with JSON payloads.
///
/// `get` is infallible by design: any failure to produce a value reads
/// as absence. `set` reports failures so callers can surface them.
pub trait Storage {
    /// Returns the stored payload for `key`, or `None` when the key is
    /// absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous payload.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory storage. Contents vanish with the value.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed storage: each key lives in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a store rooted at `dir`, creating the directory if
    /// needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::CreateDir {
            dir: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.path_for(key), value).map_err(|source| StorageError::Write {
            key: key.to_string(),
            source,
        })
    }
}
