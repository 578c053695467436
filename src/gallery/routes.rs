//! HTTP routes for client galleries

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::error::{ApiJson, ApiResult};
use crate::AppState;

use super::models::{CreateGalleryRequest, Gallery, SelectionRequest, StatusChangeRequest};
use super::services;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/galleries/:code", get(detail))
        .route("/api/galleries/:code/selection", post(submit_selection))
        .route("/api/admin/galleries", post(create))
        .route("/api/admin/galleries/:id/status", post(change_status))
}

/// GET /api/galleries/:code
async fn detail(State(state): State<AppState>, Path(code): Path<String>) -> ApiResult<Json<Gallery>> {
    Ok(Json(services::get_by_code(&state.db, &code).await?))
}

/// POST /api/galleries/:code/selection
async fn submit_selection(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ApiJson(request): ApiJson<SelectionRequest>,
) -> ApiResult<Json<Gallery>> {
    let gallery = services::submit_selection(&state.db, &code, &request.selected_images).await?;
    Ok(Json(gallery))
}

/// POST /api/admin/galleries
async fn create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateGalleryRequest>,
) -> ApiResult<(StatusCode, Json<Gallery>)> {
    let gallery = services::create_gallery(&state.db, &request).await?;
    Ok((StatusCode::CREATED, Json(gallery)))
}

/// POST /api/admin/galleries/:id/status
async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<StatusChangeRequest>,
) -> ApiResult<Json<Gallery>> {
    let gallery =
        services::advance_status(&state.db, id, request.status, &request.final_images).await?;
    Ok(Json(gallery))
}
