//! Site configuration API

use axum::{extract::State, Json};

use crate::db;
use crate::error::{ApiJson, ApiResult};
use crate::models::SiteConfig;
use crate::AppState;

/// GET /api/site-config
pub async fn get_config(State(state): State<AppState>) -> ApiResult<Json<SiteConfig>> {
    let config = db::site_config(&state.db, &state.cache).await?;
    Ok(Json((*config).clone()))
}

/// PUT /api/admin/site-config
pub async fn update_config(
    State(state): State<AppState>,
    ApiJson(config): ApiJson<SiteConfig>,
) -> ApiResult<Json<SiteConfig>> {
    let config = db::update_site_config(&state.db, &state.cache, config).await?;
    Ok(Json((*config).clone()))
}
