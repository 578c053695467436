//! Photography studio booking service.
//!
//! Quotes packages from a configurable price table, takes bookings with a
//! 50/50 deposit split, shares client galleries and sends lifecycle email.

pub mod booking;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod gallery;
pub mod models;
pub mod notifications;
pub mod pricing;
pub mod routes;

use std::sync::Arc;

use axum::{routing::get, Router};
use sqlx::PgPool;
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

use crate::cache::AppCache;
use crate::config::Config;
use crate::notifications::NotificationDispatcher;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
    pub config: Arc<Config>,
    pub notifier: NotificationDispatcher,
}

/// Assemble every route with the shared middleware stack
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::router())
        .merge(pricing::router())
        .merge(booking::router())
        .merge(gallery::router())
        .nest_service("/static", ServeDir::new("static"))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness check. Does not touch the database.
async fn health() -> &'static str {
    "ok"
}
