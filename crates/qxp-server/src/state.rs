//! Shared application state for the QXP server.
//!
//! A single [`AppState`] is built at startup and shared across all Axum
//! handlers via `Arc`.

use std::sync::Arc;

use qxp_core::draft::DraftStore;
use qxp_core::pricing::PricingConfig;
use qxp_storage::StorageBackend;

/// Shared application state passed to all HTTP handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Form draft persistence over the configured backend.
    pub drafts: DraftStore,
    /// Price basis for quotes and the pricing page.
    pub pricing: PricingConfig,
}

impl AppState {
    /// Build state over `storage` with keys under `namespace`.
    pub fn new(storage: Arc<dyn StorageBackend>, namespace: &str, pricing: PricingConfig) -> Self {
        Self {
            drafts: DraftStore::with_namespace(storage, namespace),
            pricing,
        }
    }
}
