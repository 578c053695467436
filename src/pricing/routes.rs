//! HTTP routes for the pricing calculator.

use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;

use crate::error::{ApiJson, ApiResult};
use crate::AppState;

use super::models::{Parish, ParishGroup, PricingConfig};
use super::requests::QuoteRequest;
use super::responses::QuoteResponse;
use super::services;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/pricing/quote", post(calculate_quote))
        .route("/api/pricing/config", get(get_config))
        .route("/api/pricing/parishes", get(list_parishes))
        .route("/api/admin/pricing/config", put(update_config))
}

/// POST /api/pricing/quote
async fn calculate_quote(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<QuoteRequest>,
) -> ApiResult<Json<QuoteResponse>> {
    let (selection, quote) = services::quote(&state.db, &state.cache, &request).await?;
    tracing::debug!(
        service_type = %selection.service_type,
        tier = %selection.tier,
        total = %quote.total_price,
        "Quote calculated"
    );
    Ok(Json(QuoteResponse::new(&selection, &quote)))
}

/// GET /api/pricing/config
async fn get_config(State(state): State<AppState>) -> ApiResult<Json<PricingConfig>> {
    let config = services::active_config(&state.db, &state.cache).await?;
    Ok(Json((*config).clone()))
}

#[derive(Debug, Serialize)]
struct ParishEntry {
    name: &'static str,
    group: ParishGroup,
}

/// GET /api/pricing/parishes
async fn list_parishes() -> Json<Vec<ParishEntry>> {
    Json(
        Parish::ALL
            .iter()
            .map(|p| ParishEntry {
                name: p.name(),
                group: p.group(),
            })
            .collect(),
    )
}

/// PUT /api/admin/pricing/config
async fn update_config(
    State(state): State<AppState>,
    ApiJson(config): ApiJson<PricingConfig>,
) -> ApiResult<Json<PricingConfig>> {
    let config = services::update_config(&state.db, &state.cache, config).await?;
    Ok(Json((*config).clone()))
}
