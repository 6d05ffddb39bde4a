//! In-memory storage backend.
//!
//! Stores all data in a `BTreeMap` behind a `RwLock`. Nothing survives the
//! process, so this is the backend for tests and for servers started with
//! `QXP_STORAGE=memory`. An optional byte quota mimics a browser store that
//! is full or switched off, which lets callers exercise their failure paths.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{StorageBackend, StorageError};

/// An in-memory storage backend backed by a `BTreeMap`.
///
/// Cloning is cheap and clones share the same map.
///
/// # Examples
///
/// ```
/// # use qxp_storage::{MemoryBackend, StorageBackend};
/// # #[tokio::main]
/// # async fn main() {
/// let backend = MemoryBackend::new();
/// backend.put("qxp_form_contact", b"{}").await.unwrap();
/// let val = backend.get("qxp_form_contact").await.unwrap();
/// assert_eq!(val, Some(b"{}".to_vec()));
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    data: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
    quota: Option<usize>,
}

impl MemoryBackend {
    /// Create a new empty in-memory backend with no size limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(BTreeMap::new())),
            quota: None,
        }
    }

    /// Create a backend that rejects writes once the stored keys and values
    /// would exceed `bytes` in total. A quota of zero rejects every write.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            data: Arc::new(RwLock::new(BTreeMap::new())),
            quota: Some(bytes),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn entry_size(key: &str, value: &[u8]) -> usize {
    key.len().saturating_add(value.len())
}

#[async_trait::async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let data = self.data.read().await;
        Ok(data.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let mut data = self.data.write().await;
        if let Some(quota) = self.quota {
            let used: usize = data
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| entry_size(k, v))
                .sum();
            if used.saturating_add(entry_size(key, value)) > quota {
                return Err(StorageError::Unavailable {
                    reason: format!("quota of {quota} bytes exceeded writing '{key}'"),
                });
            }
        }
        data.insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut data = self.data.write().await;
        data.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let data = self.data.read().await;
        let keys = data
            .range(prefix.to_owned()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect();
        Ok(keys)
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let data = self.data.read().await;
        Ok(data.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_nonexistent_returns_none() {
        let backend = MemoryBackend::new();
        let result = backend.get("qxp_form_missing").await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn put_overwrites_existing() {
        let backend = MemoryBackend::new();
        backend.put("key", b"v1").await.unwrap();
        backend.put("key", b"v2").await.unwrap();
        let val = backend.get("key").await.unwrap();
        assert_eq!(val, Some(b"v2".to_vec()));
    }

    #[tokio::test]
    async fn delete_nonexistent_is_noop() {
        let backend = MemoryBackend::new();
        backend.delete("nope").await.unwrap();
    }

    #[tokio::test]
    async fn list_with_prefix() {
        let backend = MemoryBackend::new();
        backend.put("qxp_form_contact", b"1").await.unwrap();
        backend.put("qxp_form_demo", b"2").await.unwrap();
        backend.put("other_form_demo", b"3").await.unwrap();

        let keys = backend.list("qxp_form_").await.unwrap();
        assert_eq!(keys, vec!["qxp_form_contact", "qxp_form_demo"]);
    }

    #[tokio::test]
    async fn exists_tracks_put_and_delete() {
        let backend = MemoryBackend::new();
        backend.put("key", b"val").await.unwrap();
        assert!(backend.exists("key").await.unwrap());
        backend.delete("key").await.unwrap();
        assert!(!backend.exists("key").await.unwrap());
    }

    #[tokio::test]
    async fn clone_shares_state() {
        let backend = MemoryBackend::new();
        let clone = backend.clone();
        backend.put("key", b"val").await.unwrap();
        let val = clone.get("key").await.unwrap();
        assert_eq!(val, Some(b"val".to_vec()));
    }

    #[tokio::test]
    async fn zero_quota_rejects_every_write() {
        let backend = MemoryBackend::with_quota(0);
        let err = backend.put("k", b"v").await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable { .. }));
        assert_eq!(backend.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn quota_counts_replacement_not_accumulation() {
        // "k" + 4 bytes = 5 bytes, twice over the same key stays within 8.
        let backend = MemoryBackend::with_quota(8);
        backend.put("k", b"aaaa").await.unwrap();
        backend.put("k", b"bbbb").await.unwrap();
        assert!(backend.put("j", b"cccc").await.is_err());
        assert_eq!(backend.get("k").await.unwrap(), Some(b"bbbb".to_vec()));
    }
}
