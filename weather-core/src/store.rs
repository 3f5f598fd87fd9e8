//! String-keyed persistence used for the response cache and search history.

use async_trait::async_trait;
use directories::ProjectDirs;
use std::{collections::HashMap, fmt::Debug, io, path::PathBuf};
use tokio::{fs, sync::Mutex};

use crate::error::StoreError;

/// Asynchronous key-value store holding string payloads.
///
/// Every operation may fail independently; callers in this crate treat the
/// store as best-effort.
#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-process store, mostly useful for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// Stores each key as its own file inside a directory.
///
/// Keys are percent-encoded into file names, so any string is a valid key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted in the platform cache directory.
    pub fn default_location() -> Result<Self, StoreError> {
        let dirs = ProjectDirs::from("dev", "weather-lookup", "weather").ok_or_else(|| {
            StoreError::Unavailable("could not determine platform cache directory".into())
        })?;
        Ok(Self::new(dirs.cache_dir()))
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(key)))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).await?;
        fs::write(self.path_for(key), value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn memory_store_set_get_remove() {
        let store = MemoryStore::new();

        assert_eq!(store.get("a").await.unwrap(), None);
        store.set("a", "1".into()).await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));

        store.remove("a").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_missing_key_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path());

        assert_eq!(store.get("weather_paris").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_creates_nested_directory_on_write() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b");
        let store = FileStore::new(&nested);

        store.set("forecast_oslo", "[]".into()).await.unwrap();

        assert!(nested.join("forecast_oslo.json").exists());
        assert_eq!(store.get("forecast_oslo").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn file_store_encodes_awkward_keys() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path());

        store.set("weather_new york/../x", "v".into()).await.unwrap();

        assert_eq!(store.get("weather_new york/../x").await.unwrap().as_deref(), Some("v"));
        let files: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn file_store_remove_missing_is_ok() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path());

        store.remove("nothing").await.unwrap();
    }
}
