//! Durable redb storage backend.
//!
//! A single-file, pure-Rust B-tree store. Drafts written here survive a
//! server or CLI restart the way browser storage survives a page reload.
//! Feature-gated behind `redb-backend` (on by default).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use redb::{Database, TableDefinition};

use crate::{StorageBackend, StorageError};

/// The single table holding every key. Namespacing lives in the key itself.
const DATA_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("data");

/// A storage backend backed by a redb database file.
///
/// Clones share the same `Database`. Blocking redb calls are offloaded to the
/// Tokio blocking pool.
///
/// # Examples
///
/// ```no_run
/// # use qxp_storage::RedbBackend;
/// let backend = RedbBackend::open("./data/drafts.redb").unwrap();
/// ```
#[derive(Clone)]
pub struct RedbBackend {
    db: Arc<Database>,
    path: PathBuf,
}

impl std::fmt::Debug for RedbBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbBackend")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

fn txn_err(e: impl std::fmt::Display) -> StorageError {
    StorageError::Transaction {
        reason: e.to_string(),
    }
}

fn table_err(e: impl std::fmt::Display) -> StorageError {
    StorageError::MissingTable {
        name: format!("data: {e}"),
    }
}

impl RedbBackend {
    /// Open or create a redb database at the given path, creating missing
    /// parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the directory or database file
    /// cannot be created, or a transaction error if the data table cannot
    /// be initialised.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let open_err = |reason: String| StorageError::Open {
            path: path.display().to_string(),
            reason,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| open_err(e.to_string()))?;
        }
        let db = Database::create(path).map_err(|e| open_err(e.to_string()))?;

        // Opening the table inside a write transaction creates it.
        let txn = db.begin_write().map_err(txn_err)?;
        {
            let _table = txn.open_table(DATA_TABLE).map_err(table_err)?;
        }
        txn.commit().map_err(txn_err)?;

        tracing::debug!(path = %path.display(), "redb storage opened");

        Ok(Self {
            db: Arc::new(db),
            path: path.to_path_buf(),
        })
    }

    /// Return the filesystem path of this database.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run a blocking closure against the database on the blocking pool.
    async fn blocking<T, F>(
        &self,
        f: F,
        on_join: impl FnOnce(String) -> StorageError,
    ) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T, StorageError> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| on_join(format!("blocking task panicked: {e}")))?
    }
}

#[async_trait::async_trait]
impl StorageBackend for RedbBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let key = key.to_owned();
        let join_key = key.clone();
        self.blocking(
            move |db| {
                let txn = db.begin_read().map_err(txn_err)?;
                let table = txn.open_table(DATA_TABLE).map_err(table_err)?;
                let value = table
                    .get(key.as_str())
                    .map_err(|e| StorageError::Read {
                        key: key.clone(),
                        reason: e.to_string(),
                    })?
                    .map(|v| v.value().to_vec());
                Ok(value)
            },
            |reason| StorageError::Read {
                key: join_key,
                reason,
            },
        )
        .await
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let key = key.to_owned();
        let join_key = key.clone();
        let value = value.to_vec();
        self.blocking(
            move |db| {
                let txn = db.begin_write().map_err(txn_err)?;
                {
                    let mut table = txn.open_table(DATA_TABLE).map_err(table_err)?;
                    table
                        .insert(key.as_str(), value.as_slice())
                        .map_err(|e| StorageError::Write {
                            key: key.clone(),
                            reason: e.to_string(),
                        })?;
                }
                txn.commit().map_err(txn_err)
            },
            |reason| StorageError::Write {
                key: join_key,
                reason,
            },
        )
        .await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let key = key.to_owned();
        let join_key = key.clone();
        self.blocking(
            move |db| {
                let txn = db.begin_write().map_err(txn_err)?;
                {
                    let mut table = txn.open_table(DATA_TABLE).map_err(table_err)?;
                    // Returns Ok(None) for a missing key.
                    table
                        .remove(key.as_str())
                        .map_err(|e| StorageError::Delete {
                            key: key.clone(),
                            reason: e.to_string(),
                        })?;
                }
                txn.commit().map_err(txn_err)
            },
            |reason| StorageError::Delete {
                key: join_key,
                reason,
            },
        )
        .await
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let prefix = prefix.to_owned();
        let join_prefix = prefix.clone();
        self.blocking(
            move |db| {
                let list_err = |e: &dyn std::fmt::Display| StorageError::List {
                    prefix: prefix.clone(),
                    reason: e.to_string(),
                };
                let txn = db.begin_read().map_err(txn_err)?;
                let table = txn.open_table(DATA_TABLE).map_err(table_err)?;

                let mut keys = Vec::new();
                for item in table.range(prefix.as_str()..).map_err(|e| list_err(&e))? {
                    let (k, _) = item.map_err(|e| list_err(&e))?;
                    let key = k.value();
                    if !key.starts_with(prefix.as_str()) {
                        break;
                    }
                    keys.push(key.to_owned());
                }
                Ok(keys)
            },
            |reason| StorageError::List {
                prefix: join_prefix,
                reason,
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn roundtrip_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drafts.redb");

        {
            let backend = RedbBackend::open(&path).unwrap();
            backend.put("qxp_form_contact", b"{\"name\":\"Jane\"}").await.unwrap();
        }

        let reopened = RedbBackend::open(&path).unwrap();
        let val = reopened.get("qxp_form_contact").await.unwrap();
        assert_eq!(val, Some(b"{\"name\":\"Jane\"}".to_vec()));
    }

    #[tokio::test]
    async fn open_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("drafts.redb");
        let backend = RedbBackend::open(&path).unwrap();
        assert_eq!(backend.path(), path.as_path());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let backend = RedbBackend::open(dir.path().join("d.redb")).unwrap();
        backend.put("k", b"v").await.unwrap();
        backend.delete("k").await.unwrap();
        backend.delete("k").await.unwrap();
        assert!(!backend.exists("k").await.unwrap());
    }

    #[tokio::test]
    async fn list_stops_at_prefix_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let backend = RedbBackend::open(dir.path().join("d.redb")).unwrap();
        backend.put("qxp_form_contact", b"1").await.unwrap();
        backend.put("qxp_form_demo", b"2").await.unwrap();
        backend.put("qxq", b"3").await.unwrap();

        let keys = backend.list("qxp_form_").await.unwrap();
        assert_eq!(keys, vec!["qxp_form_contact", "qxp_form_demo"]);
    }
}
