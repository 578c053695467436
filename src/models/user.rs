//! Account models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User from database
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub const PHOTOGRAPHER_ROLE: &'static str = "photographer";
}

/// Admin decision on a photographer application
#[derive(Debug, Deserialize)]
pub struct RejectPhotographerRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

/// Admin-composed email to a user
#[derive(Debug, Deserialize)]
pub struct AdminMessageRequest {
    pub subject: String,
    pub body_html: String,
}
