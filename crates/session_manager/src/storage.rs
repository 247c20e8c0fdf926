//! Key/value storage for persisted client state

use crate::error::{Result, SessionError};
use async_trait::async_trait;
use chat_core::Config;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

pub const CONVERSATION_KEY: &str = "erdtree-conversation";
pub const SETTINGS_KEY: &str = "settings-storage";

/// Highest blob version this build reads and the version it writes.
pub const STORAGE_VERSION: u32 = 0;

/// Raw string storage, one value per key.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// `None` when nothing is stored under `key`.
    async fn load(&self, key: &str) -> Result<Option<String>>;

    async fn save(&self, key: &str, value: &str) -> Result<()>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Envelope every persisted blob is wrapped in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VersionedBlob<T> {
    pub state: T,
    pub version: u32,
}

/// Load and unwrap a versioned blob. Rejects blobs newer than
/// [`STORAGE_VERSION`].
pub async fn load_blob<S, T>(storage: &S, key: &str) -> Result<Option<T>>
where
    S: KeyValueStorage + ?Sized,
    T: DeserializeOwned,
{
    let Some(raw) = storage.load(key).await? else {
        return Ok(None);
    };

    let blob: VersionedBlob<serde_json::Value> = serde_json::from_str(&raw)?;
    if blob.version > STORAGE_VERSION {
        return Err(SessionError::UnsupportedVersion {
            key: key.to_string(),
            found: blob.version,
            supported: STORAGE_VERSION,
        });
    }

    Ok(Some(serde_json::from_value(blob.state)?))
}

pub async fn save_blob<S, T>(storage: &S, key: &str, state: &T) -> Result<()>
where
    S: KeyValueStorage + ?Sized,
    T: Serialize + Sync,
{
    let blob = VersionedBlob {
        state,
        version: STORAGE_VERSION,
    };
    let raw = serde_json::to_string(&blob)?;
    storage.save(key, &raw).await
}

/// One `<key>.json` file per key under a base directory.
#[derive(Clone)]
pub struct FileKeyValueStorage {
    base_path: PathBuf,
}

impl FileKeyValueStorage {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Storage under the configured data directory (`~/.erdtree` by default).
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.data_dir())
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.contains("..") {
            return Err(SessionError::StorageError(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.base_path.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStorage for FileKeyValueStorage {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;

        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path).await?;
        Ok(Some(contents))
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;

        let path = self.key_path(key)?;
        fs::write(&path, value).await?;

        tracing::debug!(key, path = %path.display(), bytes = value.len(), "Storage: Saved");

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;

        if path.exists() {
            fs::remove_file(&path).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_file_storage_save_and_load() {
        let dir = tempdir().unwrap();
        let storage = FileKeyValueStorage::new(dir.path());

        storage.save("test", "{\"a\":1}").await.unwrap();

        let loaded = storage.load("test").await.unwrap();
        assert_eq!(loaded.as_deref(), Some("{\"a\":1}"));
        assert!(dir.path().join("test.json").exists());
    }

    #[tokio::test]
    async fn test_file_storage_missing_key() {
        let dir = tempdir().unwrap();
        let storage = FileKeyValueStorage::new(dir.path());

        assert!(storage.load("nonexistent").await.unwrap().is_none());
        storage.remove("nonexistent").await.unwrap();
    }

    #[tokio::test]
    async fn test_file_storage_remove() {
        let dir = tempdir().unwrap();
        let storage = FileKeyValueStorage::new(dir.path().join("nested"));

        storage.save("test", "1").await.unwrap();
        storage.remove("test").await.unwrap();

        assert!(storage.load("test").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_storage_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let storage = FileKeyValueStorage::new(dir.path().join("data"));

        for key in ["", "../escape", "a/b", "a\\b"] {
            match storage.save(key, "1").await {
                Err(SessionError::StorageError(message)) => assert!(message.contains("Invalid")),
                other => panic!("expected StorageError for {key:?}, got {other:?}"),
            }
        }
        assert!(!dir.path().join("escape.json").exists());
    }

    #[test]
    fn test_from_config_uses_data_dir() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/erdtree-test")),
            ..Config::default()
        };
        let storage = FileKeyValueStorage::from_config(&config);
        assert_eq!(storage.base_path(), Path::new("/tmp/erdtree-test"));
    }

    #[tokio::test]
    async fn test_blob_roundtrip_is_versioned() {
        let dir = tempdir().unwrap();
        let storage = FileKeyValueStorage::new(dir.path());

        save_blob(&storage, "numbers", &vec![1, 2, 3]).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&storage.load("numbers").await.unwrap().unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({ "state": [1, 2, 3], "version": 0 }));

        let loaded: Option<Vec<i32>> = load_blob(&storage, "numbers").await.unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_newer_blob_version_is_rejected() {
        let dir = tempdir().unwrap();
        let storage = FileKeyValueStorage::new(dir.path());
        storage
            .save("future", "{\"state\":{},\"version\":7}")
            .await
            .unwrap();

        let result: Result<Option<serde_json::Value>> = load_blob(&storage, "future").await;
        match result {
            Err(SessionError::UnsupportedVersion { found, supported, .. }) => {
                assert_eq!(found, 7);
                assert_eq!(supported, STORAGE_VERSION);
            }
            other => panic!("expected UnsupportedVersion, got {other:?}"),
        }
    }
}
