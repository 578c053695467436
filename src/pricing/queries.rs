//! Database queries for the pricing catalog.

use sqlx::PgPool;

use super::models::PricingConfigRow;

/// Latest saved pricing config, if an admin has ever saved one
pub async fn get_latest_pricing_config(
    pool: &PgPool,
) -> Result<Option<PricingConfigRow>, sqlx::Error> {
    sqlx::query_as::<_, PricingConfigRow>(
        r#"
        SELECT id, config, created_at
        FROM pricing_configs
        ORDER BY created_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await
}

/// Save a new pricing config. Rows are append-only so price history is kept.
pub async fn insert_pricing_config(
    pool: &PgPool,
    config: &serde_json::Value,
) -> Result<PricingConfigRow, sqlx::Error> {
    sqlx::query_as::<_, PricingConfigRow>(
        r#"
        INSERT INTO pricing_configs (config)
        VALUES ($1)
        RETURNING id, config, created_at
        "#,
    )
    .bind(config)
    .fetch_one(pool)
    .await
}
