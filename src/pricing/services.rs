//! Pricing service functions with database access.
//!
//! These functions read the active price table through the cache, falling
//! back to the database and finally the built-in defaults.

use std::sync::Arc;

use axum::http::StatusCode;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::cache::AppCache;
use crate::error::{ApiError, ValidationError};

use super::calculators::{calculate_quote, Quote, QuoteSelection};
use super::models::{ParishGroup, PricingConfig, ServiceType, Tier};
use super::queries;
use super::requests::QuoteRequest;

/// Pricing calculation error types
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No {kind} price configured for {service_type}/{tier}")]
    MissingPrice {
        kind: &'static str,
        service_type: ServiceType,
        tier: Tier,
    },

    #[error("No transportation fee configured for parish group {0}")]
    MissingTransportationFee(ParishGroup),

    #[error("Configuration error: {message}")]
    ConfigurationError {
        message: String,
        errors: Vec<String>,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<PricingError> for ApiError {
    fn from(e: PricingError) -> Self {
        match e {
            PricingError::Validation(v) => v.into(),
            PricingError::Database(db) => db.into(),
            PricingError::ConfigurationError { ref errors, .. } => {
                let details = serde_json::json!({ "errors": errors });
                ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "configuration_error", e.to_string())
                    .with_details(details)
            }
            other => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "configuration_error",
                other.to_string(),
            ),
        }
    }
}

/// The price table in effect right now.
///
/// Cache first, then the latest saved row, then the built-in defaults. A
/// saved row that fails to parse or validate is skipped with a warning so a
/// bad admin edit cannot take quoting offline.
pub async fn active_config(
    pool: &PgPool,
    cache: &AppCache,
) -> Result<Arc<PricingConfig>, PricingError> {
    if let Some(cached) = cache.pricing.get(AppCache::PRICING_KEY).await {
        return Ok(cached);
    }

    let config = match queries::get_latest_pricing_config(pool).await? {
        Some(row) => {
            let id = row.id;
            match row.parse().and_then(|c| c.validate().map(|_| c)) {
                Ok(config) => config,
                Err(e) => {
                    warn!(config_id = id, "Saved pricing config unusable, using defaults: {}", e);
                    PricingConfig::default()
                }
            }
        }
        None => {
            warn!("No pricing config saved, using built-in defaults");
            PricingConfig::default()
        }
    };

    let config = Arc::new(config);
    cache
        .pricing
        .insert(AppCache::PRICING_KEY.to_string(), config.clone())
        .await;
    Ok(config)
}

/// Validate a quote request and price it.
///
/// Enumerated values are checked before the price table is even loaded.
pub async fn quote(
    pool: &PgPool,
    cache: &AppCache,
    request: &QuoteRequest,
) -> Result<(QuoteSelection, Quote), PricingError> {
    let selection = request.validate()?;
    let config = active_config(pool, cache).await?;
    let quote = calculate_quote(&config, &selection)?;
    Ok((selection, quote))
}

/// Replace the active price table (admin).
pub async fn update_config(
    pool: &PgPool,
    cache: &AppCache,
    config: PricingConfig,
) -> Result<Arc<PricingConfig>, PricingError> {
    config.validate()?;

    let json = serde_json::to_value(&config).map_err(|e| PricingError::ConfigurationError {
        message: "Pricing config could not be serialized".to_string(),
        errors: vec![e.to_string()],
    })?;
    let row = queries::insert_pricing_config(pool, &json).await?;

    let config = Arc::new(config);
    cache
        .pricing
        .insert(AppCache::PRICING_KEY.to_string(), config.clone())
        .await;

    info!(config_id = row.id, "Pricing config updated");
    Ok(config)
}
