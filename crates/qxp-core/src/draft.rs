//! Form draft persistence.
//!
//! In-progress form values are written to a [`StorageBackend`] under
//! `<namespace>_form_<form_id>` as a JSON object of field name to string,
//! so a reload does not lose what the visitor typed. Storage is best
//! effort: [`DraftStore::save`], [`DraftStore::load`] and
//! [`DraftStore::clear`] never fail, they log and carry on. The `try_*`
//! variants return the error for callers that want to report it.

use std::collections::BTreeMap;
use std::sync::Arc;

use qxp_storage::StorageBackend;
use tracing::warn;

use crate::error::DraftError;

/// Field name to current value.
pub type FormDraft = BTreeMap<String, String>;

/// Key namespace of the reference deployment.
pub const DEFAULT_NAMESPACE: &str = "qxp";

/// Separates the namespace from the form id in a draft key.
pub const FORM_INFIX: &str = "_form_";

/// Draft persistence over a shared storage backend.
#[derive(Clone)]
pub struct DraftStore {
    storage: Arc<dyn StorageBackend>,
    namespace: String,
}

impl std::fmt::Debug for DraftStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftStore")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl DraftStore {
    /// Create a store using the default `qxp` namespace.
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self::with_namespace(storage, DEFAULT_NAMESPACE)
    }

    /// Create a store whose keys start with `namespace`.
    pub fn with_namespace(storage: Arc<dyn StorageBackend>, namespace: impl Into<String>) -> Self {
        Self {
            storage,
            namespace: namespace.into(),
        }
    }

    /// A store over the same backend whose keys live under
    /// `<namespace>_<scope>`, so drafts saved in one scope are invisible
    /// to every other scope and to the parent store.
    #[must_use]
    pub fn scoped(&self, scope: &str) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            namespace: format!("{}_{scope}", self.namespace),
        }
    }

    /// Storage key for a form's draft.
    #[must_use]
    pub fn key(&self, form_id: &str) -> String {
        format!("{}{FORM_INFIX}{form_id}", self.namespace)
    }

    fn checked_key(&self, form_id: &str) -> Result<String, DraftError> {
        let invalid = |reason: &str| DraftError::InvalidFormId {
            form_id: form_id.to_owned(),
            reason: reason.to_owned(),
        };
        if form_id.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if !form_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(invalid("only ASCII letters, digits, '-' and '_' are allowed"));
        }
        Ok(self.key(form_id))
    }

    /// Persist `draft` for `form_id`, replacing any earlier draft.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::InvalidFormId`], [`DraftError::Encode`] or
    /// [`DraftError::Storage`].
    pub async fn try_save(&self, form_id: &str, draft: &FormDraft) -> Result<(), DraftError> {
        let key = self.checked_key(form_id)?;
        let bytes = serde_json::to_vec(draft).map_err(|source| DraftError::Encode {
            form_id: form_id.to_owned(),
            source,
        })?;
        self.storage.put(&key, &bytes).await?;
        Ok(())
    }

    /// Load the draft for `form_id`. `Ok(None)` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::Corrupt`] if the stored bytes are not a JSON
    /// object of strings, or [`DraftError::Storage`] if the read fails.
    pub async fn try_load(&self, form_id: &str) -> Result<Option<FormDraft>, DraftError> {
        let key = self.checked_key(form_id)?;
        let Some(bytes) = self.storage.get(&key).await? else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| DraftError::Corrupt {
                form_id: form_id.to_owned(),
                reason: e.to_string(),
            })
    }

    /// Remove the draft for `form_id`. Clearing an absent draft succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::InvalidFormId`] or [`DraftError::Storage`].
    pub async fn try_clear(&self, form_id: &str) -> Result<(), DraftError> {
        let key = self.checked_key(form_id)?;
        self.storage.delete(&key).await?;
        Ok(())
    }

    /// Form identifiers that currently have a stored draft.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::Storage`] if listing fails.
    pub async fn list_forms(&self) -> Result<Vec<String>, DraftError> {
        let prefix = self.key("");
        let keys = self.storage.list(&prefix).await?;
        Ok(keys
            .into_iter()
            .filter_map(|k| k.strip_prefix(&prefix).map(str::to_owned))
            .collect())
    }

    /// Best-effort save. Failures are logged, never returned.
    pub async fn save(&self, form_id: &str, draft: &FormDraft) {
        if let Err(e) = self.try_save(form_id, draft).await {
            warn!(form_id, error = %e, "could not save form draft");
        }
    }

    /// Best-effort load. Missing, corrupt and unreadable drafts all come
    /// back as `None`.
    pub async fn load(&self, form_id: &str) -> Option<FormDraft> {
        match self.try_load(form_id).await {
            Ok(draft) => draft,
            Err(e) => {
                warn!(form_id, error = %e, "ignoring unreadable form draft");
                None
            }
        }
    }

    /// Best-effort clear. Failures are logged, never returned.
    pub async fn clear(&self, form_id: &str) {
        if let Err(e) = self.try_clear(form_id).await {
            warn!(form_id, error = %e, "could not clear form draft");
        }
    }
}
