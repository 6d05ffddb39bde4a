//! Pricing routes: `/v1/pricing/*`
//!
//! Quotes take raw text exactly as typed into the calculator and coerce it
//! the same way the page does, so a bad input never produces an error.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use qxp_core::pricing::{
    self, DISCOUNT_TIERS, DiscountTier, PricingInputs, PricingResult, format_money,
};

use crate::state::AppState;

/// Build the `/v1/pricing` router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tiers", get(list_tiers))
        .route("/quote", get(quote))
}

// ── Request / Response types ─────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TiersResponse {
    pub price_per_user_per_term: f64,
    pub currency: String,
    pub tiers: &'static [DiscountTier],
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteQuery {
    #[serde(default)]
    pub students: String,
    #[serde(default)]
    pub staff: String,
    #[serde(default)]
    pub terms: String,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub inputs: PricingInputs,
    pub currency: String,
    #[serde(flatten)]
    pub result: PricingResult,
    pub formatted: FormattedQuote,
}

#[derive(Debug, Serialize)]
pub struct FormattedQuote {
    pub subtotal: String,
    pub discount_amount: String,
    pub total: String,
}

// ── Handlers ─────────────────────────────────────────────────────────

async fn list_tiers(State(state): State<Arc<AppState>>) -> Json<TiersResponse> {
    Json(TiersResponse {
        price_per_user_per_term: state.pricing.price_per_user_per_term,
        currency: state.pricing.currency.clone(),
        tiers: &DISCOUNT_TIERS,
    })
}

async fn quote(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QuoteQuery>,
) -> Json<QuoteResponse> {
    let inputs = PricingInputs::from_raw(&query.students, &query.staff, &query.terms);
    let result = pricing::calculate(&inputs, &state.pricing);
    let currency = &state.pricing.currency;

    Json(QuoteResponse {
        inputs,
        currency: currency.clone(),
        formatted: FormattedQuote {
            subtotal: format_money(result.subtotal, currency),
            discount_amount: format_money(result.discount_amount, currency),
            total: format_money(result.total, currency),
        },
        result,
    })
}
