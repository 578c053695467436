//! Database queries for bookings

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::models::{Booking, BookingStatus, NewBooking, PaymentKind};

const BOOKING_COLUMNS: &str = r#"
    id, client_name, client_email, client_phone,
    service_type, tier, include_photo, include_video, number_of_people,
    parish, location, shoot_date, shoot_time, add_ons, notes,
    base_price, addons_total, transportation_fee, extra_person_fee,
    total_price, deposit_amount, balance_due, currency,
    deposit_paid, balance_paid,
    deposit_session_id, deposit_payment_ref,
    balance_session_id, balance_payment_ref,
    status, created_at, updated_at
"#;

/// Insert a new booking inside the caller's transaction
pub async fn insert_booking(
    tx: &mut Transaction<'_, Postgres>,
    booking: &NewBooking,
) -> Result<Booking, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO bookings (
            id, client_name, client_email, client_phone,
            service_type, tier, include_photo, include_video, number_of_people,
            parish, location, shoot_date, shoot_time, add_ons, notes,
            base_price, addons_total, transportation_fee, extra_person_fee,
            total_price, deposit_amount, balance_due, currency, status
        )
        VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
            $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24
        )
        RETURNING {BOOKING_COLUMNS}
        "#
    );

    let selection = &booking.selection;
    let quote = &booking.quote;

    sqlx::query_as::<_, Booking>(&sql)
        .bind(booking.id)
        .bind(&booking.client_name)
        .bind(&booking.client_email)
        .bind(&booking.client_phone)
        .bind(selection.service_type)
        .bind(selection.tier)
        .bind(selection.include_photo)
        .bind(selection.include_video)
        .bind(selection.number_of_people as i32)
        .bind(selection.parish.name())
        .bind(&booking.location)
        .bind(booking.shoot_date)
        .bind(&booking.shoot_time)
        .bind(&selection.add_ons)
        .bind(&booking.notes)
        .bind(quote.base_price)
        .bind(quote.addons_total)
        .bind(quote.transportation_fee)
        .bind(quote.extra_person_fee)
        .bind(quote.total_price)
        .bind(quote.deposit_amount)
        .bind(quote.balance_due)
        .bind(&quote.currency)
        .bind(BookingStatus::Pending)
        .fetch_one(&mut **tx)
        .await
}

/// Get a booking by id
pub async fn get_booking(pool: &PgPool, id: Uuid) -> Result<Option<Booking>, sqlx::Error> {
    let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1");
    sqlx::query_as::<_, Booking>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Lock a booking row for a payment/status update
pub async fn get_booking_for_update(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<Booking>, sqlx::Error> {
    let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE");
    sqlx::query_as::<_, Booking>(&sql)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
}

/// List bookings, newest first, optionally filtered by status
pub async fn list_bookings(
    pool: &PgPool,
    status: Option<BookingStatus>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Booking>, sqlx::Error> {
    let bookings = match status {
        Some(status) => {
            let sql = format!(
                r#"
                SELECT {BOOKING_COLUMNS}
                FROM bookings
                WHERE status = $1
                ORDER BY created_at DESC
                LIMIT $2 OFFSET $3
                "#
            );
            sqlx::query_as::<_, Booking>(&sql)
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!(
                r#"
                SELECT {BOOKING_COLUMNS}
                FROM bookings
                ORDER BY created_at DESC
                LIMIT $1 OFFSET $2
                "#
            );
            sqlx::query_as::<_, Booking>(&sql)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
        }
    };

    Ok(bookings)
}

/// Store the payment provider's checkout session id
pub async fn set_checkout_session(
    pool: &PgPool,
    id: Uuid,
    kind: PaymentKind,
    session_id: &str,
) -> Result<Option<Booking>, sqlx::Error> {
    let column = match kind {
        PaymentKind::Deposit => "deposit_session_id",
        PaymentKind::Balance => "balance_session_id",
    };
    let sql = format!(
        r#"
        UPDATE bookings
        SET {column} = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING {BOOKING_COLUMNS}
        "#
    );
    sqlx::query_as::<_, Booking>(&sql)
        .bind(id)
        .bind(session_id)
        .fetch_optional(pool)
        .await
}

/// Mark one half of the price as paid and set the resulting status
pub async fn mark_paid(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    kind: PaymentKind,
    payment_ref: &str,
    status: BookingStatus,
) -> Result<Booking, sqlx::Error> {
    let (flag, reference) = match kind {
        PaymentKind::Deposit => ("deposit_paid", "deposit_payment_ref"),
        PaymentKind::Balance => ("balance_paid", "balance_payment_ref"),
    };
    let sql = format!(
        r#"
        UPDATE bookings
        SET {flag} = TRUE, {reference} = $2, status = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING {BOOKING_COLUMNS}
        "#
    );
    sqlx::query_as::<_, Booking>(&sql)
        .bind(id)
        .bind(payment_ref)
        .bind(status)
        .fetch_one(&mut **tx)
        .await
}

/// Update booking status
pub async fn set_status(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    status: BookingStatus,
) -> Result<Booking, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE bookings
        SET status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING {BOOKING_COLUMNS}
        "#
    );
    sqlx::query_as::<_, Booking>(&sql)
        .bind(id)
        .bind(status)
        .fetch_one(&mut **tx)
        .await
}
