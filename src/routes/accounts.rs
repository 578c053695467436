//! Account administration: photographer applications and direct messages

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::db;
use crate::error::{ApiError, ApiJson, ApiResult, ValidationError};
use crate::models::{AdminMessageRequest, RejectPhotographerRequest, User};
use crate::notifications::NotificationEvent;
use crate::AppState;

async fn load_photographer(state: &AppState, id: Uuid) -> ApiResult<User> {
    db::get_photographer(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Photographer {id} not found")))
}

/// POST /api/admin/photographers/:id/approve
pub async fn approve_photographer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    let photographer = load_photographer(&state, id).await?;
    if photographer.approved {
        return Ok(Json(photographer));
    }

    let user = db::set_user_approved(&state.db, id, true).await?;
    tracing::info!(user_id = %id, "Photographer approved");
    state.notifier.dispatch(
        &user.email,
        NotificationEvent::PhotographerApproved {
            name: user.full_name.clone(),
        },
    );
    Ok(Json(user))
}

/// POST /api/admin/photographers/:id/reject
pub async fn reject_photographer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<RejectPhotographerRequest>,
) -> ApiResult<Json<User>> {
    let photographer = load_photographer(&state, id).await?;
    let user = if photographer.approved {
        db::set_user_approved(&state.db, id, false).await?
    } else {
        photographer
    };

    let reason = request
        .reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());
    tracing::info!(user_id = %id, "Photographer rejected");
    state.notifier.dispatch(
        &user.email,
        NotificationEvent::PhotographerRejected {
            name: user.full_name.clone(),
            reason,
        },
    );
    Ok(Json(user))
}

#[derive(Debug, Serialize)]
pub struct MessageSent {
    pub delivered: bool,
    pub to: String,
}

/// POST /api/admin/users/:id/messages
///
/// Sends synchronously so the admin sees whether delivery worked.
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<AdminMessageRequest>,
) -> ApiResult<Json<MessageSent>> {
    let subject = request.subject.trim();
    if subject.is_empty() {
        return Err(ValidationError::MissingField("subject").into());
    }
    if request.body_html.trim().is_empty() {
        return Err(ValidationError::MissingField("body_html").into());
    }

    let user = db::get_user(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User {id} not found")))?;

    let event = NotificationEvent::AdminMessage {
        recipient_name: Some(user.full_name.clone()),
        subject: subject.to_string(),
        body_html: request.body_html,
    };
    state.notifier.send(&user.email, event).await.map_err(|e| {
        ApiError::new(StatusCode::BAD_GATEWAY, "delivery_error", e.to_string())
    })?;

    Ok(Json(MessageSent {
        delivered: true,
        to: user.email,
    }))
}
