//! Gallery service functions.
//!
//! Clients reach a gallery only through its access code. Selection and
//! status changes lock the row so concurrent submissions cannot interleave.

use axum::http::StatusCode;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::booking;
use crate::booking::requests::validate_email;
use crate::error::{ApiError, ValidationError};

use super::models::{
    generate_access_code, normalize_access_code, CreateGalleryRequest, Gallery, GalleryStatus,
    SelectionError,
};
use super::queries;

/// Fresh codes tried before giving up on a create
const ACCESS_CODE_ATTEMPTS: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("Gallery not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl From<GalleryError> for ApiError {
    fn from(e: GalleryError) -> Self {
        match e {
            GalleryError::Validation(v) => v.into(),
            GalleryError::Selection(SelectionError::NotOpen(_)) => {
                ApiError::new(StatusCode::CONFLICT, "conflict", e.to_string())
            }
            GalleryError::Selection(s) => {
                ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "validation_error", s.to_string())
            }
            GalleryError::NotFound => ApiError::not_found(e.to_string()),
            GalleryError::Conflict(msg) => ApiError::new(StatusCode::CONFLICT, "conflict", msg),
            GalleryError::Persistence(db) => db.into(),
        }
    }
}

fn is_unique_violation(e: &sqlx::Error, constraint: &str) -> bool {
    match e {
        sqlx::Error::Database(db) => {
            db.is_unique_violation() && db.constraint() == Some(constraint)
        }
        _ => false,
    }
}

/// Create a gallery (admin), optionally tied to a booking.
pub async fn create_gallery(
    pool: &PgPool,
    request: &CreateGalleryRequest,
) -> Result<Gallery, GalleryError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(ValidationError::MissingField("title").into());
    }
    let client_email = request.client_email.trim();
    validate_email(client_email)?;
    let previews: Vec<String> = request
        .preview_images
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if let Some(booking_id) = request.booking_id {
        if booking::queries::get_booking(pool, booking_id).await?.is_none() {
            return Err(ValidationError::InvalidField {
                field: "booking_id",
                reason: format!("booking {booking_id} does not exist"),
            }
            .into());
        }
    }

    for _ in 0..ACCESS_CODE_ATTEMPTS {
        let code = generate_access_code();
        match queries::insert_gallery(pool, request.booking_id, title, client_email, &code, &previews)
            .await
        {
            Ok(gallery) => {
                info!(gallery_id = %gallery.id, booking_id = ?gallery.booking_id, "Gallery created");
                return Ok(gallery);
            }
            Err(e) if is_unique_violation(&e, "galleries_access_code_key") => {
                warn!("Access code collision, retrying");
            }
            Err(e) if is_unique_violation(&e, "galleries_booking_id_key") => {
                return Err(GalleryError::Conflict(
                    "This booking already has a gallery".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(GalleryError::Conflict(
        "Could not allocate a unique access code".to_string(),
    ))
}

/// Look up a gallery by the code the client was given.
pub async fn get_by_code(pool: &PgPool, code: &str) -> Result<Gallery, GalleryError> {
    queries::get_gallery_by_code(pool, &normalize_access_code(code))
        .await?
        .ok_or(GalleryError::NotFound)
}

/// Store the client's picks and hand the gallery to editing.
pub async fn submit_selection(
    pool: &PgPool,
    code: &str,
    selected: &[String],
) -> Result<Gallery, GalleryError> {
    let mut tx = pool.begin().await?;
    let current = queries::get_gallery_by_code_for_update(&mut tx, &normalize_access_code(code))
        .await?
        .ok_or(GalleryError::NotFound)?;

    let picks = current.check_selection(selected)?;
    let gallery = queries::save_selection(&mut tx, current.id, &picks).await?;
    tx.commit().await?;

    info!(gallery_id = %gallery.id, selected = picks.len(), "Gallery selection submitted");
    Ok(gallery)
}

/// Move a gallery forward (admin).
pub async fn advance_status(
    pool: &PgPool,
    id: Uuid,
    next: GalleryStatus,
    final_images: &[String],
) -> Result<Gallery, GalleryError> {
    let mut tx = pool.begin().await?;
    let current = queries::get_gallery_for_update(&mut tx, id)
        .await?
        .ok_or(GalleryError::NotFound)?;

    if !current.status.can_advance_to(next) {
        return Err(GalleryError::Conflict(format!(
            "Gallery cannot move from {} to {}",
            current.status, next
        )));
    }

    let finals = (next == GalleryStatus::Completed && !final_images.is_empty())
        .then_some(final_images);
    let gallery = queries::set_status(&mut tx, id, next, finals).await?;
    tx.commit().await?;

    info!(gallery_id = %id, from = %current.status, to = %next, "Gallery status changed");
    Ok(gallery)
}
