//! Server configuration.
//!
//! Loaded from `QXP_*` environment variables with defaults that run a
//! development server on localhost with in-memory drafts.

use std::net::SocketAddr;
use std::path::PathBuf;

use qxp_core::draft::DEFAULT_NAMESPACE;
use qxp_core::pricing::PricingConfig;

const DEFAULT_PORT: u16 = 8080;

/// Server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Where form drafts are kept.
    pub storage_backend: StorageBackendType,
    /// Namespace prepended to draft keys.
    pub storage_namespace: String,
    /// Log level filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Price basis for quotes and the pricing page.
    pub pricing: PricingConfig,
}

/// Supported storage backend types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackendType {
    /// In-memory; drafts are lost on restart.
    Memory,
    /// redb database file.
    Redb { path: PathBuf },
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// Environment variables:
    /// - `QXP_BIND_ADDR` — full bind address (default `127.0.0.1:8080`)
    /// - `PORT` — port to bind on `0.0.0.0` when `QXP_BIND_ADDR` is unset
    /// - `QXP_STORAGE` — `memory` or `redb` (default `memory`)
    /// - `QXP_STORAGE_PATH` — redb file (default `./data/drafts.redb`)
    /// - `QXP_STORAGE_PREFIX` — draft key namespace (default `qxp`)
    /// - `QXP_LOG_LEVEL` — log filter (default `info`)
    /// - `QXP_PRICE_PER_TERM` — price per user per term (default `999`)
    /// - `QXP_CURRENCY` — currency code (default `KES`)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let default_addr = SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT));
        // QXP_BIND_ADDR > PORT > default
        let bind_addr = if let Some(addr) = var("QXP_BIND_ADDR") {
            addr.parse().unwrap_or(default_addr)
        } else if let Some(port) = var("PORT") {
            SocketAddr::from(([0, 0, 0, 0], port.parse().unwrap_or(DEFAULT_PORT)))
        } else {
            default_addr
        };

        let storage_backend = match var("QXP_STORAGE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "redb" => StorageBackendType::Redb {
                path: var("QXP_STORAGE_PATH")
                    .unwrap_or_else(|| "./data/drafts.redb".to_owned())
                    .into(),
            },
            _ => StorageBackendType::Memory,
        };

        let storage_namespace = var("QXP_STORAGE_PREFIX")
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_owned());

        let log_level = var("QXP_LOG_LEVEL").unwrap_or_else(|| "info".to_owned());

        let defaults = PricingConfig::default();
        let pricing = PricingConfig {
            price_per_user_per_term: var("QXP_PRICE_PER_TERM")
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|p| p.is_finite() && *p >= 0.0)
                .unwrap_or(defaults.price_per_user_per_term),
            currency: var("QXP_CURRENCY")
                .filter(|c| !c.is_empty())
                .unwrap_or(defaults.currency),
        };

        Self {
            bind_addr,
            storage_backend,
            storage_namespace,
            log_level,
            pricing,
        }
    }
}
