//! Form draft routes: `/v1/drafts/{form_id}`
//!
//! Load, replace and clear the persisted draft of a lead form. A missing or
//! corrupt draft reads as an empty object.
//!
//! Drafts belong to a visitor, identified by the `qxp_visitor` cookie. A
//! request without a valid cookie is a new visitor: it gets a fresh id in a
//! `Set-Cookie` header and starts with no drafts.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use qxp_core::draft::{DraftStore, FormDraft};
use qxp_core::error::DraftError;
use qxp_core::form::FormKind;

use crate::error::AppError;
use crate::state::AppState;

/// Cookie carrying the visitor id that scopes draft storage.
pub const VISITOR_COOKIE: &str = "qxp_visitor";

/// Build the `/v1/drafts` router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/{form_id}", get(load_draft).put(save_draft).delete(clear_draft))
}

struct Visitor {
    id: Uuid,
    issued: bool,
}

impl Visitor {
    fn from_headers(headers: &HeaderMap) -> Self {
        let known = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == VISITOR_COOKIE)
            .and_then(|(_, value)| Uuid::parse_str(value).ok());

        match known {
            Some(id) => Self { id, issued: false },
            None => Self {
                id: Uuid::new_v4(),
                issued: true,
            },
        }
    }

    fn drafts(&self, state: &AppState) -> DraftStore {
        state.drafts.scoped(&self.id.simple().to_string())
    }

    /// Attach the `Set-Cookie` header when this request minted the id.
    fn respond(&self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if self.issued {
            let cookie = format!("{VISITOR_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", self.id);
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().append(SET_COOKIE, value);
            }
        }
        response
    }
}

async fn load_draft(
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let kind = FormKind::from_id(&form_id)?;
    let visitor = Visitor::from_headers(&headers);
    let draft = match visitor.drafts(&state).try_load(kind.id()).await {
        Ok(draft) => draft.unwrap_or_default(),
        Err(DraftError::Corrupt { reason, .. }) => {
            tracing::warn!(form_id = kind.id(), %reason, "ignoring corrupt form draft");
            FormDraft::new()
        }
        Err(e) => return Err(e.into()),
    };
    Ok(visitor.respond(Json(draft)))
}

async fn save_draft(
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
    headers: HeaderMap,
    Json(draft): Json<FormDraft>,
) -> Result<Response, AppError> {
    let kind = FormKind::from_id(&form_id)?;
    let visitor = Visitor::from_headers(&headers);
    visitor.drafts(&state).try_save(kind.id(), &draft).await?;
    Ok(visitor.respond(StatusCode::NO_CONTENT))
}

async fn clear_draft(
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let kind = FormKind::from_id(&form_id)?;
    let visitor = Visitor::from_headers(&headers);
    visitor.drafts(&state).try_clear(kind.id()).await?;
    Ok(visitor.respond(StatusCode::NO_CONTENT))
}
