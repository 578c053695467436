//! Database access
//!
//! Query functions plus the cached loaders that sit in front of them.

mod queries;

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{info, warn};

use crate::cache::AppCache;
use crate::models::{Review, SiteConfig};

pub use queries::*;

pub const REVIEWS_PER_PAGE: i64 = 12;

/// Deepest review page served; later pages read as this one
pub const MAX_REVIEW_PAGE: i64 = 500;

/// Row offset of a 1-based page. `None` if it doesn't fit an `i64`.
pub fn page_offset(page: i64, per_page: i64) -> Option<i64> {
    page.max(1).checked_sub(1)?.checked_mul(per_page)
}

/// Create the Postgres connection pool
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Site config through the cache. Falls back to defaults when nothing usable
/// has been saved.
pub async fn site_config(pool: &PgPool, cache: &AppCache) -> Result<Arc<SiteConfig>, sqlx::Error> {
    if let Some(cached) = cache.site.get(AppCache::SITE_KEY).await {
        tracing::debug!("Cache HIT for site config");
        return Ok(cached);
    }

    let config = match queries::get_site_config(pool).await? {
        Some(row) => {
            let id = row.id;
            row.parse().unwrap_or_else(|| {
                warn!(config_id = id, "Saved site config unusable, using defaults");
                SiteConfig::default()
            })
        }
        None => SiteConfig::default(),
    };

    let config = Arc::new(config);
    cache
        .site
        .insert(AppCache::SITE_KEY.to_string(), config.clone())
        .await;
    Ok(config)
}

/// Replace the site config and refresh the cache
pub async fn update_site_config(
    pool: &PgPool,
    cache: &AppCache,
    config: SiteConfig,
) -> Result<Arc<SiteConfig>, sqlx::Error> {
    let json = serde_json::to_value(&config).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
    let row = queries::insert_site_config(pool, &json).await?;

    let config = Arc::new(config);
    cache
        .site
        .insert(AppCache::SITE_KEY.to_string(), config.clone())
        .await;
    info!(config_id = row.id, "Site config updated");
    Ok(config)
}

/// A page of approved reviews through the cache
pub async fn approved_reviews(
    pool: &PgPool,
    cache: &AppCache,
    page: i64,
) -> Result<Arc<Vec<Review>>, sqlx::Error> {
    let page = page.clamp(1, MAX_REVIEW_PAGE);
    let key = AppCache::review_listing_key(page);
    if let Some(cached) = cache.reviews.get(&key).await {
        return Ok(cached);
    }

    let offset = (page - 1) * REVIEWS_PER_PAGE;
    let reviews = Arc::new(queries::get_approved_reviews(pool, REVIEWS_PER_PAGE, offset).await?);
    cache.reviews.insert(key, reviews.clone()).await;
    Ok(reviews)
}
