//! HTTP routes for bookings

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use uuid::Uuid;

use crate::error::{ApiJson, ApiResult};
use crate::AppState;

use super::models::Booking;
use super::requests::{
    BookingListQuery, BookingRequest, CheckoutSessionRequest, RecordPaymentRequest,
};
use super::services;

const BOOKINGS_PER_PAGE: i64 = 25;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/bookings", post(create))
        .route("/api/bookings/:id", get(detail))
        .route("/api/admin/bookings", get(list))
        .route("/api/admin/bookings/:id/checkout", post(attach_checkout))
        .route("/api/admin/bookings/:id/payments", post(record_payment))
        .route("/api/admin/bookings/:id/complete", post(complete))
}

/// POST /api/bookings
async fn create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BookingRequest>,
) -> ApiResult<(StatusCode, Json<Booking>)> {
    let today = Utc::now().date_naive();
    let booking =
        services::submit_booking(&state.db, &state.cache, &state.notifier, &request, today).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /api/bookings/:id
async fn detail(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<Booking>> {
    Ok(Json(services::get_booking(&state.db, id).await?))
}

/// GET /api/admin/bookings
async fn list(
    State(state): State<AppState>,
    Query(query): Query<BookingListQuery>,
) -> ApiResult<Json<Vec<Booking>>> {
    let bookings = services::list_bookings(
        &state.db,
        query.status.as_deref(),
        query.page,
        BOOKINGS_PER_PAGE,
    )
    .await?;
    Ok(Json(bookings))
}

/// POST /api/admin/bookings/:id/checkout
async fn attach_checkout(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<CheckoutSessionRequest>,
) -> ApiResult<Json<Booking>> {
    let booking =
        services::attach_checkout_session(&state.db, id, request.kind, &request.session_id).await?;
    Ok(Json(booking))
}

/// POST /api/admin/bookings/:id/payments
async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<RecordPaymentRequest>,
) -> ApiResult<Json<Booking>> {
    let booking = services::record_payment(
        &state.db,
        &state.notifier,
        id,
        request.kind,
        &request.payment_ref,
    )
    .await?;
    Ok(Json(booking))
}

/// POST /api/admin/bookings/:id/complete
async fn complete(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<Booking>> {
    Ok(Json(services::complete_booking(&state.db, id).await?))
}
