//! Review route handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::db;
use crate::error::{ApiError, ApiJson, ApiResult};
use crate::models::{Review, ReviewRequest};
use crate::AppState;

/// Query parameters for the review listing
#[derive(Debug, Deserialize)]
pub struct ReviewListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

/// GET /api/reviews
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ReviewListQuery>,
) -> ApiResult<Json<Vec<Review>>> {
    let reviews = db::approved_reviews(&state.db, &state.cache, query.page).await?;
    Ok(Json((*reviews).clone()))
}

/// POST /api/reviews
///
/// Stored unapproved; it shows up once an admin approves it.
pub async fn submit(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ReviewRequest>,
) -> ApiResult<(StatusCode, Json<Review>)> {
    let review = request.validate()?;
    let review = db::insert_review(&state.db, &review).await?;
    tracing::info!(review_id = %review.id, rating = review.rating, "Review submitted");
    Ok((StatusCode::CREATED, Json(review)))
}

/// POST /api/admin/reviews/:id/approve
pub async fn approve(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<Review>> {
    let review = db::approve_review(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Review {id} not found")))?;
    state.cache.invalidate_reviews();
    tracing::info!(review_id = %id, "Review approved");
    Ok(Json(review))
}
