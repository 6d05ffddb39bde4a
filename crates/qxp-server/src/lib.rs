//! QXP site HTTP server.
//!
//! Serves the page shell at `/`, which carries every rendered page and
//! routes on the URL fragment in the browser, plus the view, pricing and
//! form draft JSON APIs under `/v1/*`.

pub mod config;
pub mod error;
pub mod pages;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .nest("/v1/views", routes::views::router())
        .nest("/v1/pricing", routes::pricing::router())
        .nest("/v1/drafts", routes::drafts::router())
        .nest("/v1/forms", routes::forms::router())
        .nest("/v1/sys", routes::sys::router())
        .layer(tower::limit::ConcurrencyLimitLayer::new(256))
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    Router::new()
        .merge(routes::site::router())
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .with_state(state)
}
