//! Form definition routes: `/v1/forms/*`
//!
//! Submission itself never leaves the browser; the server only describes
//! the forms and checks values against their rules.

use std::sync::Arc;

use axum::extract::Path;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use qxp_core::draft::FormDraft;
use qxp_core::form::{FieldSpec, FormKind};

use crate::error::AppError;
use crate::state::AppState;

/// Build the `/v1/forms` router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/{form_id}", get(describe_form))
        .route("/{form_id}/validate", post(validate_form))
}

#[derive(Debug, Serialize)]
pub struct FormResponse {
    pub form: FormKind,
    pub fields: &'static [FieldSpec],
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
}

async fn describe_form(Path(form_id): Path<String>) -> Result<Json<FormResponse>, AppError> {
    let kind = FormKind::from_id(&form_id)?;
    Ok(Json(FormResponse {
        form: kind,
        fields: kind.fields(),
    }))
}

async fn validate_form(
    Path(form_id): Path<String>,
    Json(values): Json<FormDraft>,
) -> Result<Json<ValidateResponse>, AppError> {
    let kind = FormKind::from_id(&form_id)?;
    kind.validate(&values)?;
    Ok(Json(ValidateResponse { valid: true }))
}
