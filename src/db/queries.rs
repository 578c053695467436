//! Database queries for site config, reviews and accounts

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{NewReview, Review, SiteConfigRow, User};

/// Latest saved site config
pub async fn get_site_config(pool: &PgPool) -> Result<Option<SiteConfigRow>, sqlx::Error> {
    sqlx::query_as::<_, SiteConfigRow>(
        r#"
        SELECT id, config, created_at
        FROM site_configs
        ORDER BY created_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await
}

/// Save a new site config row
pub async fn insert_site_config(
    pool: &PgPool,
    config: &serde_json::Value,
) -> Result<SiteConfigRow, sqlx::Error> {
    sqlx::query_as::<_, SiteConfigRow>(
        r#"
        INSERT INTO site_configs (config)
        VALUES ($1)
        RETURNING id, config, created_at
        "#,
    )
    .bind(config)
    .fetch_one(pool)
    .await
}

/// Store a review awaiting approval
pub async fn insert_review(pool: &PgPool, review: &NewReview) -> Result<Review, sqlx::Error> {
    sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews (id, client_name, rating, comment, service_type)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, client_name, rating, comment, service_type, approved, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&review.client_name)
    .bind(review.rating)
    .bind(&review.comment)
    .bind(review.service_type)
    .fetch_one(pool)
    .await
}

/// Approved reviews, newest first
pub async fn get_approved_reviews(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<Review>, sqlx::Error> {
    sqlx::query_as::<_, Review>(
        r#"
        SELECT id, client_name, rating, comment, service_type, approved, created_at
        FROM reviews
        WHERE approved
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Mark a review approved. `None` if it doesn't exist.
pub async fn approve_review(pool: &PgPool, id: Uuid) -> Result<Option<Review>, sqlx::Error> {
    sqlx::query_as::<_, Review>(
        r#"
        UPDATE reviews
        SET approved = TRUE
        WHERE id = $1
        RETURNING id, client_name, rating, comment, service_type, approved, created_at
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Get a photographer account by id
pub async fn get_photographer(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, full_name, role, approved, created_at
        FROM users
        WHERE id = $1 AND role = $2
        "#,
    )
    .bind(id)
    .bind(User::PHOTOGRAPHER_ROLE)
    .fetch_optional(pool)
    .await
}

/// Get any account by id
pub async fn get_user(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, full_name, role, approved, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Set the approval flag on an account
pub async fn set_user_approved(
    pool: &PgPool,
    id: Uuid,
    approved: bool,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET approved = $2
        WHERE id = $1
        RETURNING id, email, full_name, role, approved, created_at
        "#,
    )
    .bind(id)
    .bind(approved)
    .fetch_one(pool)
    .await
}
