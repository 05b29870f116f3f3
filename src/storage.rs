use crate::errors::CounterError;
use crate::models::StoredEntries;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::error;

/// Minimal string key-value capability, shaped like browser web storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), CounterError>;
    fn remove(&self, key: &str) -> Result<(), CounterError>;
}

/// Session-scoped store; its contents die with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CounterError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CounterError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

/// Durable store backed by a JSON file, rewritten on every mutation.
///
/// Writes are synchronous and block the calling task for the duration of a
/// small file write, matching the synchronous `KeyValueStore` contract.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: Mutex<StoredEntries>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file starts empty; an unreadable
    /// or corrupt one is logged and also starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = load_entries(&path);
        Self {
            path,
            data: Mutex::new(data),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, data: &StoredEntries) -> Result<(), CounterError> {
        let payload = serde_json::to_vec_pretty(data).map_err(CounterError::storage)?;
        fs::write(&self.path, payload)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let data = self.data.lock().unwrap_or_else(|e| e.into_inner());
        data.entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CounterError> {
        let mut data = self.data.lock().unwrap_or_else(|e| e.into_inner());
        data.entries.insert(key.to_string(), value.to_string());
        self.persist(&data)
    }

    fn remove(&self, key: &str) -> Result<(), CounterError> {
        let mut data = self.data.lock().unwrap_or_else(|e| e.into_inner());
        if data.entries.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&data)
    }
}

fn load_entries(path: &Path) -> StoredEntries {
    match fs::read(path) {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse state file {}: {err}", path.display());
                StoredEntries::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => StoredEntries::default(),
        Err(err) => {
            error!("failed to read state file {}: {err}", path.display());
            StoredEntries::default()
        }
    }
}
