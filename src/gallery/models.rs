//! Client gallery records.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ValidationError;

pub const ACCESS_CODE_LEN: usize = 8;

/// Code characters. 0/O and 1/I are left out so codes read back cleanly.
const ACCESS_CODE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Gallery lifecycle, in the only order it may move
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "gallery_status", rename_all = "lowercase")]
pub enum GalleryStatus {
    /// Uploaded, not yet shown to the client
    Pending,
    /// Client is choosing images to edit
    Selection,
    /// Selection submitted, studio is editing
    Editing,
    /// Finals delivered
    Completed,
}

impl GalleryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GalleryStatus::Pending => "pending",
            GalleryStatus::Selection => "selection",
            GalleryStatus::Editing => "editing",
            GalleryStatus::Completed => "completed",
        }
    }

    /// Status changes are forward-only
    pub fn can_advance_to(&self, next: GalleryStatus) -> bool {
        next > *self
    }
}

impl fmt::Display for GalleryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GalleryStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(GalleryStatus::Pending),
            "selection" => Ok(GalleryStatus::Selection),
            "editing" => Ok(GalleryStatus::Editing),
            "completed" => Ok(GalleryStatus::Completed),
            _ => Err(ValidationError::InvalidField {
                field: "status",
                reason: format!("unknown gallery status '{s}'"),
            }),
        }
    }
}

/// Gallery row from galleries
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Gallery {
    pub id: Uuid,
    pub booking_id: Option<Uuid>,
    pub title: String,
    pub client_email: String,
    pub access_code: String,
    pub preview_images: Vec<String>,
    pub selected_images: Vec<String>,
    pub final_images: Vec<String>,
    pub status: GalleryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Gallery {
    /// Check a client's picks against this gallery.
    ///
    /// Returns the picks with duplicates removed, in submission order.
    pub fn check_selection(&self, selected: &[String]) -> Result<Vec<String>, SelectionError> {
        if self.status != GalleryStatus::Selection {
            return Err(SelectionError::NotOpen(self.status));
        }

        let previews: HashSet<&str> = self.preview_images.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();
        let mut picks = Vec::with_capacity(selected.len());
        for image in selected {
            let image = image.trim();
            if image.is_empty() || !seen.insert(image) {
                continue;
            }
            if !previews.contains(image) {
                return Err(SelectionError::UnknownImage(image.to_string()));
            }
            picks.push(image.to_string());
        }

        if picks.is_empty() {
            return Err(SelectionError::Empty);
        }
        Ok(picks)
    }
}

/// Why a selection was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Gallery is not open for selection (status: {0})")]
    NotOpen(GalleryStatus),

    #[error("Image '{0}' is not part of this gallery")]
    UnknownImage(String),

    #[error("No images selected")]
    Empty,
}

/// Random access code for client gallery links
pub fn generate_access_code() -> String {
    let mut rng = rand::rng();
    (0..ACCESS_CODE_LEN)
        .map(|_| {
            let idx = rng.random_range(0..ACCESS_CODE_CHARSET.len());
            char::from(ACCESS_CODE_CHARSET[idx])
        })
        .collect()
}

/// Normalise a code typed or pasted by a client
pub fn normalize_access_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Admin gallery creation
#[derive(Debug, Deserialize)]
pub struct CreateGalleryRequest {
    #[serde(default)]
    pub booking_id: Option<Uuid>,
    pub title: String,
    pub client_email: String,
    #[serde(default)]
    pub preview_images: Vec<String>,
}

/// Client selection submission
#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub selected_images: Vec<String>,
}

/// Admin status change
#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: GalleryStatus,
    /// Delivered images, stored when moving to completed
    #[serde(default)]
    pub final_images: Vec<String>,
}
