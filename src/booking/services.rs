//! Booking service functions.
//!
//! Submission prices the selection server-side and writes the row in a
//! single transaction. Payment flags only change through `record_payment`.
//! Notifications are fired after commit and never affect the outcome.

use axum::http::StatusCode;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::cache::AppCache;
use crate::error::{ApiError, ValidationError};
use crate::notifications::{BookingSummary, EmailDelivery, NotificationDispatcher, NotificationEvent};
use crate::pricing::services::active_config;
use crate::pricing::{calculate_quote, PricingError};

use super::models::{Booking, BookingStatus, NewBooking, PaymentKind};
use super::queries;
use super::requests::BookingRequest;

/// Booking operation errors
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Booking {0} not found")]
    NotFound(Uuid),

    #[error("{0}")]
    Conflict(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl From<BookingError> for ApiError {
    fn from(e: BookingError) -> Self {
        match e {
            BookingError::Validation(v) => v.into(),
            BookingError::Pricing(p) => p.into(),
            BookingError::NotFound(_) => ApiError::not_found(e.to_string()),
            BookingError::Conflict(msg) => ApiError::new(StatusCode::CONFLICT, "conflict", msg),
            BookingError::Persistence(db) => db.into(),
        }
    }
}

/// What recording a payment should do to a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Already paid; nothing changes and no email goes out
    AlreadyRecorded,
    /// Set the flag and move to this status
    Record(BookingStatus),
}

/// Decide how a payment applies to the current booking state.
pub fn plan_payment(booking: &Booking, kind: PaymentKind) -> Result<PaymentOutcome, BookingError> {
    if booking.is_paid(kind) {
        return Ok(PaymentOutcome::AlreadyRecorded);
    }
    match kind {
        PaymentKind::Deposit => Ok(PaymentOutcome::Record(BookingStatus::Confirmed)),
        PaymentKind::Balance if !booking.deposit_paid => Err(BookingError::Conflict(format!(
            "Booking {} cannot take the balance before the deposit",
            booking.id
        ))),
        PaymentKind::Balance => Ok(PaymentOutcome::Record(booking.status)),
    }
}

/// A booking can be completed once both halves are paid.
pub fn check_completable(booking: &Booking) -> Result<(), BookingError> {
    if booking.deposit_paid && booking.balance_paid {
        Ok(())
    } else {
        Err(BookingError::Conflict(format!(
            "Booking {} still has {} {} outstanding",
            booking.id,
            booking.currency,
            booking.outstanding()
        )))
    }
}

/// Validate, price and store a booking submission.
pub async fn submit_booking<D: EmailDelivery>(
    pool: &PgPool,
    cache: &AppCache,
    notifier: &NotificationDispatcher<D>,
    request: &BookingRequest,
    today: NaiveDate,
) -> Result<Booking, BookingError> {
    let (details, selection) = request.validate(today)?;

    let config = active_config(pool, cache).await?;
    let quote = calculate_quote(&config, &selection)?;

    let new_booking = NewBooking {
        id: Uuid::new_v4(),
        client_name: details.client_name,
        client_email: details.client_email,
        client_phone: details.client_phone,
        location: details.location,
        shoot_date: details.shoot_date,
        shoot_time: details.shoot_time,
        notes: details.notes,
        selection,
        quote,
    };

    let mut tx = pool.begin().await?;
    let booking = queries::insert_booking(&mut tx, &new_booking).await?;
    tx.commit().await?;

    info!(
        booking_id = %booking.id,
        service_type = %booking.service_type,
        tier = %booking.tier,
        total = %booking.total_price,
        "Booking created"
    );

    notifier.dispatch(
        &booking.client_email,
        NotificationEvent::BookingConfirmed(BookingSummary::from(&booking)),
    );

    Ok(booking)
}

pub async fn get_booking(pool: &PgPool, id: Uuid) -> Result<Booking, BookingError> {
    queries::get_booking(pool, id)
        .await?
        .ok_or(BookingError::NotFound(id))
}

/// Store the checkout session the payment provider opened for a booking.
pub async fn attach_checkout_session(
    pool: &PgPool,
    id: Uuid,
    kind: PaymentKind,
    session_id: &str,
) -> Result<Booking, BookingError> {
    let session_id = session_id.trim();
    if session_id.is_empty() {
        return Err(ValidationError::MissingField("session_id").into());
    }
    queries::set_checkout_session(pool, id, kind, session_id)
        .await?
        .ok_or(BookingError::NotFound(id))
}

/// Record a completed payment reported by the payment collaborator.
///
/// Repeated reports for an already-paid half are no-ops.
pub async fn record_payment<D: EmailDelivery>(
    pool: &PgPool,
    notifier: &NotificationDispatcher<D>,
    id: Uuid,
    kind: PaymentKind,
    payment_ref: &str,
) -> Result<Booking, BookingError> {
    let payment_ref = payment_ref.trim();
    if payment_ref.is_empty() {
        return Err(ValidationError::MissingField("payment_ref").into());
    }

    let mut tx = pool.begin().await?;
    let current = queries::get_booking_for_update(&mut tx, id)
        .await?
        .ok_or(BookingError::NotFound(id))?;

    let status = match plan_payment(&current, kind)? {
        PaymentOutcome::AlreadyRecorded => {
            tx.rollback().await?;
            info!(booking_id = %id, kind = %kind, "Payment already recorded");
            return Ok(current);
        }
        PaymentOutcome::Record(status) => status,
    };

    let booking = queries::mark_paid(&mut tx, id, kind, payment_ref, status).await?;
    tx.commit().await?;

    info!(booking_id = %id, kind = %kind, status = ?booking.status, "Payment recorded");

    notifier.dispatch(
        &booking.client_email,
        NotificationEvent::PaymentReceived {
            booking: BookingSummary::from(&booking),
            kind,
            amount: booking.amount_for(kind),
        },
    );

    Ok(booking)
}

/// Mark a fully paid booking as completed (admin).
pub async fn complete_booking(pool: &PgPool, id: Uuid) -> Result<Booking, BookingError> {
    let mut tx = pool.begin().await?;
    let current = queries::get_booking_for_update(&mut tx, id)
        .await?
        .ok_or(BookingError::NotFound(id))?;

    if current.status == BookingStatus::Completed {
        tx.rollback().await?;
        return Ok(current);
    }
    check_completable(&current)?;

    let booking = queries::set_status(&mut tx, id, BookingStatus::Completed).await?;
    tx.commit().await?;

    info!(booking_id = %id, "Booking completed");
    Ok(booking)
}

pub async fn list_bookings(
    pool: &PgPool,
    status: Option<&str>,
    page: i64,
    per_page: i64,
) -> Result<Vec<Booking>, BookingError> {
    let status = status
        .filter(|s| !s.trim().is_empty())
        .map(str::parse::<BookingStatus>)
        .transpose()?;
    let offset = crate::db::page_offset(page, per_page).ok_or(ValidationError::InvalidField {
        field: "page",
        reason: "page number too large".to_string(),
    })?;
    Ok(queries::list_bookings(pool, status, per_page, offset).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::models::fixtures;
    use crate::notifications::delivery::testing::RecordingMailer;
    use crate::notifications::events::test_context;

    #[test]
    fn test_deposit_confirms_booking() {
        let booking = fixtures::booking();
        assert_eq!(
            plan_payment(&booking, PaymentKind::Deposit).unwrap(),
            PaymentOutcome::Record(BookingStatus::Confirmed)
        );
    }

    #[test]
    fn test_repeated_deposit_is_noop() {
        let mut booking = fixtures::booking();
        booking.deposit_paid = true;
        booking.status = BookingStatus::Confirmed;
        assert_eq!(
            plan_payment(&booking, PaymentKind::Deposit).unwrap(),
            PaymentOutcome::AlreadyRecorded
        );
    }

    #[test]
    fn test_balance_before_deposit_rejected() {
        let booking = fixtures::booking();
        assert!(matches!(
            plan_payment(&booking, PaymentKind::Balance),
            Err(BookingError::Conflict(_))
        ));
    }

    #[test]
    fn test_balance_keeps_status() {
        let mut booking = fixtures::booking();
        booking.deposit_paid = true;
        booking.status = BookingStatus::Confirmed;
        assert_eq!(
            plan_payment(&booking, PaymentKind::Balance).unwrap(),
            PaymentOutcome::Record(BookingStatus::Confirmed)
        );
    }

    #[test]
    fn test_completion_requires_full_payment() {
        let mut booking = fixtures::booking();
        booking.deposit_paid = true;
        let err = check_completable(&booking).unwrap_err();
        assert!(err.to_string().contains("USD 167"));

        booking.balance_paid = true;
        assert!(check_completable(&booking).is_ok());
    }

    /// Pool whose server refuses connections, with pricing already cached
    async fn unreachable_store() -> (PgPool, AppCache) {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_secs(2))
            .connect_lazy("postgres://studio@127.0.0.1:1/studio")
            .unwrap();
        let cache = AppCache::new();
        cache
            .pricing
            .insert(
                AppCache::PRICING_KEY.to_string(),
                std::sync::Arc::new(crate::pricing::PricingConfig::default()),
            )
            .await;
        (pool, cache)
    }

    fn recording_notifier() -> NotificationDispatcher<RecordingMailer> {
        NotificationDispatcher::new(RecordingMailer::default(), test_context())
    }

    #[tokio::test]
    async fn test_store_failure_sends_no_confirmation() {
        let (pool, cache) = unreachable_store().await;
        let notifier = recording_notifier();
        let request: BookingRequest = serde_json::from_value(serde_json::json!({
            "service_type": "photoshoot",
            "tier": "gold",
            "media_types": ["photo"],
            "parish": "Manchester",
            "client_name": "Tanya Brown",
            "client_email": "tanya@example.com",
            "client_phone": "876-555-0101",
            "location": "Mandeville",
            "shoot_date": "2030-03-14"
        }))
        .unwrap();
        let today = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();

        let result = submit_booking(&pool, &cache, &notifier, &request, today).await;

        assert!(matches!(result, Err(BookingError::Persistence(_))));
        tokio::task::yield_now().await;
        assert!(notifier.delivery().sent().is_empty());
    }

    #[tokio::test]
    async fn test_payment_store_failure_sends_no_receipt() {
        let (pool, _cache) = unreachable_store().await;
        let notifier = recording_notifier();

        let result = record_payment(
            &pool,
            &notifier,
            fixtures::booking().id,
            PaymentKind::Deposit,
            "pi_3Nk2",
        )
        .await;

        assert!(matches!(result, Err(BookingError::Persistence(_))));
        tokio::task::yield_now().await;
        assert!(notifier.delivery().sent().is_empty());
    }

    #[tokio::test]
    async fn test_huge_page_rejected() {
        let (pool, _cache) = unreachable_store().await;
        assert!(matches!(
            list_bookings(&pool, None, i64::MAX, 25).await,
            Err(BookingError::Validation(ValidationError::InvalidField { field: "page", .. }))
        ));
    }

    #[test]
    fn test_error_status_codes() {
        let id = Uuid::nil();
        let err: ApiError = BookingError::NotFound(id).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err: ApiError = BookingError::Conflict("nope".to_string()).into();
        assert_eq!(err.status, StatusCode::CONFLICT);

        let err: ApiError = BookingError::from(ValidationError::MissingField("client_name")).into();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);

        let err: ApiError = BookingError::Persistence(sqlx::Error::PoolClosed).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body.error_type, "persistence_error");
    }
}
