use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;

use crate::error::ChatStoreError;
use crate::keys::sanitize_key_for_filename;

/// String-keyed store of JSON documents.
///
/// Absent keys mean "not yet initialized"; no schema versioning is assumed.
/// Implementations must preserve whatever JSON they were given verbatim.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, ChatStoreError>;
    fn set(&self, key: &str, value: &Value) -> Result<(), ChatStoreError>;
    fn remove(&self, key: &str) -> Result<(), ChatStoreError>;
    /// Drop every stored key.
    fn clear(&self) -> Result<(), ChatStoreError>;
}

/// File-backed store holding one JSON document per key under a root
/// directory. Single-client by design; no cross-process locking.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ChatStoreError> {
        let root = root.into();
        if root.exists() && !root.is_dir() {
            return Err(ChatStoreError::InvalidRoot { path: root });
        }
        fs::create_dir_all(&root)
            .map_err(|source| ChatStoreError::io("creating store root", &root, source))?;
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.json", sanitize_key_for_filename(key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, ChatStoreError> {
        let path = self.key_path(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ChatStoreError::io("reading key file", &path, source)),
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| ChatStoreError::json_parse(key, source))
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), ChatStoreError> {
        let path = self.key_path(key);
        let raw = serde_json::to_string_pretty(value)
            .map_err(|source| ChatStoreError::json_serialize(key, source))?;
        fs::write(&path, raw)
            .map_err(|source| ChatStoreError::io("writing key file", &path, source))
    }

    fn remove(&self, key: &str) -> Result<(), ChatStoreError> {
        let path = self.key_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ChatStoreError::io("removing key file", &path, source)),
        }
    }

    fn clear(&self) -> Result<(), ChatStoreError> {
        let entries = fs::read_dir(&self.root)
            .map_err(|source| ChatStoreError::io("listing store root", &self.root, source))?;

        for entry in entries {
            let entry =
                entry.map_err(|source| ChatStoreError::io("listing store root", &self.root, source))?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(&path)
                    .map_err(|source| ChatStoreError::io("removing key file", &path, source))?;
            }
        }

        Ok(())
    }
}

/// In-memory store used by tests and ephemeral clients.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, ChatStoreError> {
        Ok(lock_unpoisoned(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), ChatStoreError> {
        lock_unpoisoned(&self.entries).insert(key.to_owned(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ChatStoreError> {
        lock_unpoisoned(&self.entries).remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), ChatStoreError> {
        lock_unpoisoned(&self.entries).clear();
        Ok(())
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
