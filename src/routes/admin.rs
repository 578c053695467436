//! Cache monitoring for operators

use axum::{extract::State, http::StatusCode, Json};

use crate::cache::CacheStats;
use crate::AppState;

/// GET /api/admin/cache
pub async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}

/// POST /api/admin/cache/invalidate
pub async fn invalidate_cache(State(state): State<AppState>) -> StatusCode {
    state.cache.invalidate_all();
    StatusCode::NO_CONTENT
}
