//! In-memory caching using moka
//!
//! Holds the active price table, the site configuration and pages of
//! approved reviews. Admin writes replace or invalidate entries directly;
//! TTLs bound how stale a change made by another instance can be.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::models::{Review, SiteConfig};
use crate::{db, pricing};

/// Application cache
#[derive(Clone)]
pub struct AppCache {
    /// Active pricing config (singleton)
    pub pricing: Cache<String, Arc<pricing::PricingConfig>>,
    /// Site config (singleton)
    pub site: Cache<String, Arc<SiteConfig>>,
    /// Approved review pages (cache_key -> Vec<Review>)
    pub reviews: Cache<String, Arc<Vec<Review>>>,
}

impl AppCache {
    pub const PRICING_KEY: &'static str = "pricing";
    pub const SITE_KEY: &'static str = "site";

    pub fn new() -> Self {
        Self {
            // Pricing: 1 entry, 10 min TTL
            pricing: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(10 * 60))
                .build(),

            // Site config: 1 entry, 30 min TTL
            site: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(30 * 60))
                .build(),

            // Review pages: 20 entries, 15 min TTL
            reviews: Cache::builder()
                .max_capacity(20)
                .time_to_live(Duration::from_secs(15 * 60))
                .time_to_idle(Duration::from_secs(5 * 60))
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            pricing_cached: self.pricing.contains_key(Self::PRICING_KEY),
            site_cached: self.site.contains_key(Self::SITE_KEY),
            review_pages: self.reviews.entry_count(),
        }
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.pricing.invalidate_all();
        self.site.invalidate_all();
        self.reviews.invalidate_all();
        info!("All caches invalidated");
    }

    /// Drop every cached review page, e.g. after an approval
    pub fn invalidate_reviews(&self) {
        self.reviews.invalidate_all();
        info!("Review cache invalidated");
    }

    /// Generate cache key for a page of approved reviews
    pub fn review_listing_key(page: i64) -> String {
        format!("reviews:{}", page)
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub pricing_cached: bool,
    pub site_cached: bool,
    pub review_pages: u64,
}

/// Start background cache warmer
///
/// Warms the cache on startup and refreshes every 10 minutes.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool) {
    let mut interval = interval(Duration::from_secs(10 * 60));
    loop {
        // First tick completes immediately
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

async fn warm_cache(cache: &AppCache, db: &PgPool) {
    info!("Starting cache warm-up...");

    // Drop the singletons first so the reads below go to the database
    cache.pricing.invalidate(AppCache::PRICING_KEY).await;
    if let Err(e) = pricing::services::active_config(db, cache).await {
        warn!("Failed to warm pricing cache: {}", e);
    }

    cache.site.invalidate(AppCache::SITE_KEY).await;
    if let Err(e) = db::site_config(db, cache).await {
        warn!("Failed to warm site config cache: {}", e);
    }

    match db::get_approved_reviews(db, db::REVIEWS_PER_PAGE, 0).await {
        Ok(reviews) => {
            let key = AppCache::review_listing_key(1);
            cache.reviews.insert(key, Arc::new(reviews)).await;
        }
        Err(e) => warn!("Failed to warm review cache: {}", e),
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalidate_reviews_keeps_singletons() {
        let cache = AppCache::new();
        cache
            .site
            .insert(AppCache::SITE_KEY.to_string(), Arc::new(SiteConfig::default()))
            .await;
        cache
            .reviews
            .insert(AppCache::review_listing_key(1), Arc::new(Vec::new()))
            .await;

        cache.invalidate_reviews();

        assert!(cache.reviews.get(&AppCache::review_listing_key(1)).await.is_none());
        assert!(cache.site.get(AppCache::SITE_KEY).await.is_some());
    }

    #[test]
    fn test_review_listing_key() {
        assert_eq!(AppCache::review_listing_key(3), "reviews:3");
    }
}
