//! Error types for `qxp-core`.
//!
//! Draft errors exist so that callers who care (the HTTP API, the CLI) can
//! report them; the plain `save`/`load`/`clear` operations on
//! [`DraftStore`](crate::draft::DraftStore) log and swallow them instead.

use qxp_storage::StorageError;

/// Errors from form draft persistence.
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    /// The form identifier cannot be used as part of a storage key.
    #[error("invalid form id '{form_id}': {reason}")]
    InvalidFormId { form_id: String, reason: String },

    /// The draft could not be serialized.
    #[error("failed to encode draft for form '{form_id}': {source}")]
    Encode {
        form_id: String,
        #[source]
        source: serde_json::Error,
    },

    /// The stored value is not a field-name to string mapping.
    #[error("stored draft for form '{form_id}' is corrupt: {reason}")]
    Corrupt { form_id: String, reason: String },

    /// The underlying storage backend returned an error.
    #[error("draft storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors from form sessions and submissions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// No form is registered under this identifier.
    #[error("unknown form '{form_id}'")]
    UnknownForm { form_id: String },

    /// The form has no field with this name.
    #[error("form '{form_id}' has no field '{field}'")]
    UnknownField { form_id: String, field: String },

    /// A required field is empty.
    #[error("field '{field}' is required")]
    MissingField { field: String },

    /// An email field does not hold an email address.
    #[error("'{value}' is not a valid email address")]
    InvalidEmail { value: String },

    /// A choice field holds a value outside its options.
    #[error("'{value}' is not a valid option for field '{field}'")]
    InvalidChoice { field: String, value: String },

    /// The form is showing its confirmation and cannot change until it resets.
    #[error("form has already been submitted")]
    AlreadySubmitted,
}
