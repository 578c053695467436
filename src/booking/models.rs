//! Booking records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::pricing::{Quote, QuoteSelection, ServiceType, Tier};

/// Booking lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
}

impl FromStr for BookingStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "completed" => Ok(BookingStatus::Completed),
            _ => Err(ValidationError::InvalidField {
                field: "status",
                reason: format!("unknown booking status '{s}'"),
            }),
        }
    }
}

/// Which half of the price a payment covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Deposit,
    Balance,
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentKind::Deposit => "deposit",
            PaymentKind::Balance => "balance",
        })
    }
}

/// Booking row from bookings
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: Uuid,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub service_type: ServiceType,
    pub tier: Tier,
    pub include_photo: bool,
    pub include_video: bool,
    pub number_of_people: i32,
    pub parish: String,
    pub location: String,
    pub shoot_date: NaiveDate,
    pub shoot_time: Option<String>,
    pub add_ons: Vec<String>,
    pub notes: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub addons_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub transportation_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub extra_person_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub deposit_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub balance_due: Decimal,
    pub currency: String,
    pub deposit_paid: bool,
    pub balance_paid: bool,
    pub deposit_session_id: Option<String>,
    pub deposit_payment_ref: Option<String>,
    pub balance_session_id: Option<String>,
    pub balance_payment_ref: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Short human-facing reference (first 8 hex digits of the id)
    pub fn reference(&self) -> String {
        self.id.simple().to_string()[..8].to_uppercase()
    }

    pub fn is_paid(&self, kind: PaymentKind) -> bool {
        match kind {
            PaymentKind::Deposit => self.deposit_paid,
            PaymentKind::Balance => self.balance_paid,
        }
    }

    pub fn amount_for(&self, kind: PaymentKind) -> Decimal {
        match kind {
            PaymentKind::Deposit => self.deposit_amount,
            PaymentKind::Balance => self.balance_due,
        }
    }

    /// Amount still owed
    pub fn outstanding(&self) -> Decimal {
        let mut owed = Decimal::ZERO;
        if !self.deposit_paid {
            owed += self.deposit_amount;
        }
        if !self.balance_paid {
            owed += self.balance_due;
        }
        owed
    }
}

/// Everything needed to insert a booking row. Built only from a validated
/// request and a server-side quote.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub id: Uuid,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub location: String,
    pub shoot_date: NaiveDate,
    pub shoot_time: Option<String>,
    pub notes: Option<String>,
    pub selection: QuoteSelection,
    pub quote: Quote,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use rust_decimal_macros::dec;

    pub fn booking() -> Booking {
        Booking {
            id: Uuid::parse_str("3f2b9c1e-0000-4000-8000-000000000001").unwrap(),
            client_name: "Tanya Brown".to_string(),
            client_email: "tanya@example.com".to_string(),
            client_phone: "876-555-0101".to_string(),
            service_type: ServiceType::Photoshoot,
            tier: Tier::Gold,
            include_photo: true,
            include_video: false,
            number_of_people: 1,
            parish: "Manchester".to_string(),
            location: "Mandeville Hotel gardens".to_string(),
            shoot_date: NaiveDate::from_ymd_opt(2030, 3, 14).unwrap(),
            shoot_time: Some("10:00".to_string()),
            add_ons: vec![],
            notes: None,
            base_price: dec!(300),
            addons_total: dec!(0),
            transportation_fee: dec!(35),
            extra_person_fee: dec!(0),
            total_price: dec!(335),
            deposit_amount: dec!(168),
            balance_due: dec!(167),
            currency: "USD".to_string(),
            deposit_paid: false,
            balance_paid: false,
            deposit_session_id: None,
            deposit_payment_ref: None,
            balance_session_id: None,
            balance_payment_ref: None,
            status: BookingStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_is_short_uppercase() {
        let booking = fixtures::booking();
        assert_eq!(booking.reference(), "3F2B9C1E");
    }

    #[test]
    fn test_outstanding() {
        let mut booking = fixtures::booking();
        assert_eq!(booking.outstanding(), dec!(335));
        booking.deposit_paid = true;
        assert_eq!(booking.outstanding(), dec!(167));
        booking.balance_paid = true;
        assert_eq!(booking.outstanding(), dec!(0));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Confirmed".parse::<BookingStatus>().unwrap(), BookingStatus::Confirmed);
        assert!("cancelled".parse::<BookingStatus>().is_err());
    }
}
