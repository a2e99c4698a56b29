//! Local cache for history and drafts.
//!
//! Entries are keyed by document and page so that two documents never share
//! history, while reloading the same page restores it.

use crate::errors::CacheError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Composite cache key.
///
/// The document id is length-prefixed, so no `(document, page)` pair can be
/// spelled the same way as another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn history(document_id: &str, page_id: &str) -> Self {
        Self::scoped("history", document_id, page_id)
    }

    pub fn draft(document_id: &str, page_id: &str) -> Self {
        Self::scoped("draft", document_id, page_id)
    }

    fn scoped(kind: &str, document_id: &str, page_id: &str) -> Self {
        Self(format!("{}:{}:{}:{}", kind, document_id.len(), document_id, page_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// SHA-256 of the key in hex: a fixed-length file name for any ids
    pub fn file_stem(&self) -> String {
        hex::encode(Sha256::digest(self.0.as_bytes()))
    }
}

pub trait LocalCache {
    fn read(&self, key: &CacheKey) -> Result<Option<String>, CacheError>;
    fn write(&self, key: &CacheKey, value: &str) -> Result<(), CacheError>;
    fn remove(&self, key: &CacheKey) -> Result<(), CacheError>;
}

pub fn read_json<T, C>(cache: &C, key: &CacheKey) -> Result<Option<T>, CacheError>
where
    T: DeserializeOwned,
    C: LocalCache + ?Sized,
{
    match cache.read(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn write_json<T, C>(cache: &C, key: &CacheKey, value: &T) -> Result<(), CacheError>
where
    T: Serialize + ?Sized,
    C: LocalCache + ?Sized,
{
    cache.write(key, &serde_json::to_string(value)?)
}

/// Process-local cache
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<CacheKey, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LocalCache for MemoryCache {
    fn read(&self, key: &CacheKey) -> Result<Option<String>, CacheError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &CacheKey, value: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.clone(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &CacheKey) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// One JSON file per key under a directory
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.file_stem()))
    }
}

impl LocalCache for FileCache {
    fn read(&self, key: &CacheKey) -> Result<Option<String>, CacheError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, key: &CacheKey, value: &str) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        std::fs::write(&path, value)?;
        debug!(key = key.as_str(), path = %path.display(), "Cache entry written");
        Ok(())
    }

    fn remove(&self, key: &CacheKey) -> Result<(), CacheError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
