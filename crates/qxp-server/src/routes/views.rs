//! View resolution: `/v1/views`
//!
//! Resolves a fragment to the view the shell would show, with its rendered
//! HTML and the entry redirect, for clients other than the shell. Resolution
//! itself is the core router's; this route only adds rendering.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use qxp_core::route::Route;
use qxp_core::router::{self, ENTRY_FRAGMENT};
use qxp_core::view::View;

use crate::pages;
use crate::state::AppState;

/// Build the `/v1/views` router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(resolve_view))
}

#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub fragment: String,
}

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    /// View chosen by the router.
    pub selected: View,
    /// View actually drawn (`not_found` for unknown solution slugs).
    pub rendered: &'static str,
    pub route: Route,
    pub title: String,
    pub html: String,
    /// Fragment the shell should replace the current one with, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'static str>,
}

async fn resolve_view(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ViewQuery>,
) -> Json<ViewResponse> {
    let (route, selected) = router::resolve(&query.fragment);
    let page = pages::render(&selected, &state.pricing);
    tracing::debug!(fragment = %query.fragment, view = selected.id(), "view resolved");

    Json(ViewResponse {
        redirect: router::needs_entry_redirect(&query.fragment).then_some(ENTRY_FRAGMENT),
        selected,
        rendered: page.rendered,
        route,
        title: page.title,
        html: page.html,
    })
}
