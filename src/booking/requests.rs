//! Request DTOs for booking endpoints.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::ValidationError;
use crate::pricing::requests::QuoteRequest;
use crate::pricing::QuoteSelection;

use super::models::PaymentKind;

/// Booking form submission
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    #[serde(flatten)]
    pub quote: QuoteRequest,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub client_phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub shoot_date: Option<NaiveDate>,
    #[serde(default)]
    pub shoot_time: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Contact and shoot details that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDetails {
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub location: String,
    pub shoot_date: NaiveDate,
    pub shoot_time: Option<String>,
    pub notes: Option<String>,
}

impl BookingRequest {
    /// Validate contact details and the package selection. `today` is the
    /// earliest acceptable shoot date.
    pub fn validate(
        &self,
        today: NaiveDate,
    ) -> Result<(BookingDetails, QuoteSelection), ValidationError> {
        let client_name = required("client_name", &self.client_name)?;
        let client_email = required("client_email", &self.client_email)?.to_lowercase();
        validate_email(&client_email)?;
        let client_phone = required("client_phone", &self.client_phone)?;
        let location = required("location", &self.location)?;

        let shoot_date = self
            .shoot_date
            .ok_or(ValidationError::MissingField("shoot_date"))?;
        if shoot_date < today {
            return Err(ValidationError::InvalidField {
                field: "shoot_date",
                reason: format!("{shoot_date} is in the past"),
            });
        }

        let selection = self.quote.validate()?;

        Ok((
            BookingDetails {
                client_name,
                client_email,
                client_phone,
                location,
                shoot_date,
                shoot_time: optional(&self.shoot_time),
                notes: optional(&self.notes),
            },
            selection,
        ))
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Minimal address check: one `@`, a non-empty local part and a dotted domain.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidEmail(email.to_string());

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}

/// Store a payment provider checkout session on a booking
#[derive(Debug, Deserialize)]
pub struct CheckoutSessionRequest {
    pub kind: PaymentKind,
    pub session_id: String,
}

/// Payment completion reported by the payment collaborator
#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    pub kind: PaymentKind,
    pub payment_ref: String,
}

/// Admin booking listing filters
#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}
