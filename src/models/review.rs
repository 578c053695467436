//! Client review models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::pricing::ServiceType;

const MAX_COMMENT_CHARS: usize = 2000;

/// Review from database
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: Uuid,
    pub client_name: String,
    pub rating: i16,
    pub comment: String,
    pub service_type: Option<ServiceType>,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Public review submission
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub client_name: String,
    pub rating: i16,
    pub comment: String,
    #[serde(default)]
    pub service_type: Option<String>,
}

/// A submission that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub client_name: String,
    pub rating: i16,
    pub comment: String,
    pub service_type: Option<ServiceType>,
}

impl ReviewRequest {
    pub fn validate(&self) -> Result<NewReview, ValidationError> {
        let client_name = self.client_name.trim();
        if client_name.is_empty() {
            return Err(ValidationError::MissingField("client_name"));
        }
        if !(1..=5).contains(&self.rating) {
            return Err(ValidationError::InvalidRating(self.rating));
        }
        let comment = self.comment.trim();
        if comment.is_empty() {
            return Err(ValidationError::MissingField("comment"));
        }
        if comment.chars().count() > MAX_COMMENT_CHARS {
            return Err(ValidationError::InvalidField {
                field: "comment",
                reason: format!("must be at most {} characters", MAX_COMMENT_CHARS),
            });
        }
        let service_type = match self.service_type.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(s.parse::<ServiceType>()?),
        };

        Ok(NewReview {
            client_name: client_name.to_string(),
            rating: self.rating,
            comment: comment.to_string(),
            service_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(rating: i16) -> ReviewRequest {
        ReviewRequest {
            client_name: "  Keisha  ".to_string(),
            rating,
            comment: "Beautiful photos, very patient with the kids.".to_string(),
            service_type: Some("Photoshoot".to_string()),
        }
    }

    #[test]
    fn test_valid_review() {
        let review = request(5).validate().unwrap();
        assert_eq!(review.client_name, "Keisha");
        assert_eq!(review.service_type, Some(ServiceType::Photoshoot));
    }

    #[test]
    fn test_rating_out_of_range() {
        assert_eq!(request(0).validate(), Err(ValidationError::InvalidRating(0)));
        assert_eq!(request(6).validate(), Err(ValidationError::InvalidRating(6)));
    }

    #[test]
    fn test_blank_service_type_is_none() {
        let mut req = request(4);
        req.service_type = Some("  ".to_string());
        assert_eq!(req.validate().unwrap().service_type, None);
    }

    #[test]
    fn test_unknown_service_type_rejected() {
        let mut req = request(4);
        req.service_type = Some("portrait".to_string());
        assert!(matches!(
            req.validate(),
            Err(ValidationError::UnknownServiceType(_))
        ));
    }

    #[test]
    fn test_empty_comment_rejected() {
        let mut req = request(3);
        req.comment = "   ".to_string();
        assert_eq!(req.validate(), Err(ValidationError::MissingField("comment")));
    }
}
