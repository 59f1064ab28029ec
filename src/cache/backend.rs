//! Key-value store backends.

use crate::{BoxStream, Error};
use async_trait::async_trait;
use bytes::Bytes;
use futures::{stream, TryStreamExt};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Byte stream read back from a store, with its length when the backend knows it.
pub struct StoredStream {
    pub len: Option<u64>,
    pub stream: BoxStream<'static, Bytes>,
}

/// Flat string-keyed persistence: values are either raw bytes or strings.
///
/// Implementations must tolerate concurrent readers and writers; each single
/// `put_*` replaces its key's value as a whole.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn put_bytes(&self, key: &str, value: Bytes) -> Result<(), StoreError>;
    async fn put_string(&self, key: &str, value: &str) -> Result<(), StoreError>;
    async fn get_stream(&self, key: &str) -> Result<Option<StoredStream>, StoreError>;
    async fn get_string(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn contains_key(&self, key: &str) -> Result<bool, StoreError>;
    async fn remove(&self, key: &str) -> Result<bool, StoreError>;
    fn name(&self) -> &'static str;
}

/// One file per key inside a directory.
///
/// File names are the SHA-256 hex digest of the key, since keys are URLs.
#[derive(Debug, Clone)]
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        let name: String = hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();
        self.dir.join(name)
    }

    /// Write to a temporary sibling then rename over the target.
    async fn write_atomic(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::io(&self.dir, e))?;
        let target = self.path_for(key);
        let tmp = self.dir.join(format!(".tmp-{}", uuid::Uuid::new_v4()));

        let write = async {
            let mut file = fs::File::create(&tmp).await?;
            file.write_all(data).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&tmp, &target).await
        };
        if let Err(e) = write.await {
            let _ = fs::remove_file(&tmp).await;
            return Err(StoreError::io(&target, e));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for DiskStore {
    async fn put_bytes(&self, key: &str, value: Bytes) -> Result<(), StoreError> {
        self.write_atomic(key, &value).await
    }

    async fn put_string(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.write_atomic(key, value.as_bytes()).await
    }

    async fn get_stream(&self, key: &str) -> Result<Option<StoredStream>, StoreError> {
        let path = self.path_for(key);
        let file = match fs::File::open(&path).await {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        let len = file
            .metadata()
            .await
            .map_err(|e| StoreError::io(&path, e))?
            .len();
        let stream = ReaderStream::new(file).map_err(move |e| Error::from(StoreError::io(&path, e)));
        Ok(Some(StoredStream {
            len: Some(len),
            stream: Box::pin(stream),
        }))
    }

    async fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read(&path).await {
            Ok(data) => Ok(Some(String::from_utf8_lossy(&data).into_owned())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    async fn contains_key(&self, key: &str) -> Result<bool, StoreError> {
        let path = self.path_for(key);
        fs::try_exists(&path)
            .await
            .map_err(|e| StoreError::io(&path, e))
    }

    async fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    fn name(&self) -> &'static str {
        "disk"
    }
}

/// Process-local store, mostly for tests and ephemeral clients.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn insert(&self, key: &str, value: Bytes) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn put_bytes(&self, key: &str, value: Bytes) -> Result<(), StoreError> {
        self.insert(key, value)
    }

    async fn put_string(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.insert(key, Bytes::copy_from_slice(value.as_bytes()))
    }

    async fn get_stream(&self, key: &str) -> Result<Option<StoredStream>, StoreError> {
        Ok(self.get(key)?.map(|data| StoredStream {
            len: Some(data.len() as u64),
            stream: Box::pin(stream::once(async move { Ok::<_, Error>(data) })),
        }))
    }

    async fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .get(key)?
            .map(|data| String::from_utf8_lossy(&data).into_owned()))
    }

    async fn contains_key(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }

    async fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.remove(key).is_some())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
