//! Durable key-value storage

use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Values read from or written to a [`KeyValueStore`]
pub type StoreItems = HashMap<String, Value>;

/// Host key-value store used to persist the active override
///
/// Missing keys are simply absent from the result of [`get`](Self::get).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the entries for `keys`
    async fn get(&self, keys: &[&str]) -> StorageResult<StoreItems>;

    /// Write every entry of `items`
    async fn set(&self, items: StoreItems) -> StorageResult<()>;

    /// Delete the entries for `keys`
    async fn remove(&self, keys: &[&str]) -> StorageResult<()>;
}

/// In-process store; contents are lost when it is dropped
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<StoreItems>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `items`
    pub fn with_items(items: StoreItems) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> StoreItems {
        self.items.lock().clone()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: &[&str]) -> StorageResult<StoreItems> {
        let items = self.items.lock();
        Ok(keys
            .iter()
            .filter_map(|key| items.get(*key).map(|value| ((*key).to_string(), value.clone())))
            .collect())
    }

    async fn set(&self, items: StoreItems) -> StorageResult<()> {
        self.items.lock().extend(items);
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> StorageResult<()> {
        let mut items = self.items.lock();
        for key in keys {
            items.remove(*key);
        }
        Ok(())
    }
}

/// Store persisted as one JSON object in a file
///
/// Writes go to a uniquely named temporary file in the same directory that
/// is then renamed over the target, so neither a crash nor a concurrent
/// writer in another process leaves a half-written store behind.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    io_lock: tokio::sync::Mutex<()>,
}

impl JsonFileStore {
    /// Create a store backed by `path`; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            io_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> StorageResult<Map<String, Value>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Store file {:?} does not exist yet", self.path);
                return Ok(Map::new());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&content)? {
            Value::Object(map) => Ok(map),
            other => Err(StorageError::Corrupt {
                path: self.path.clone(),
                reason: format!("expected a JSON object, found {}", json_type(&other)),
            }),
        }
    }

    async fn write_all(&self, map: &Map<String, Value>) -> StorageResult<()> {
        let bytes = serde_json::to_vec_pretty(map)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || replace_file(&path, &bytes))
            .await
            .map_err(|e| StorageError::Backend(format!("store write task failed: {e}")))??;
        debug!("Wrote {} entries to {:?}", map.len(), self.path);
        Ok(())
    }
}

/// Write `bytes` to a uniquely named sibling of `path`, then rename it over `path`
fn replace_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, keys: &[&str]) -> StorageResult<StoreItems> {
        let _guard = self.io_lock.lock().await;
        let map = self.read_all().await?;
        Ok(keys
            .iter()
            .filter_map(|key| map.get(*key).map(|value| ((*key).to_string(), value.clone())))
            .collect())
    }

    async fn set(&self, items: StoreItems) -> StorageResult<()> {
        let _guard = self.io_lock.lock().await;
        let mut map = self.read_all().await?;
        map.extend(items);
        self.write_all(&map).await
    }

    async fn remove(&self, keys: &[&str]) -> StorageResult<()> {
        let _guard = self.io_lock.lock().await;
        let mut map = self.read_all().await?;
        let before = map.len();
        for key in keys {
            map.remove(*key);
        }
        if map.len() == before {
            return Ok(());
        }
        self.write_all(&map).await
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
