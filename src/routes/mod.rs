//! Page and API routes outside the pricing, booking and gallery modules

pub mod accounts;
pub mod admin;
pub mod pages;
pub mod reviews;
pub mod site;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact).post(pages::submit_contact))
        .route("/pricing", get(pages::pricing_page))
        .route("/api/reviews", get(reviews::list).post(reviews::submit))
        .route("/api/admin/reviews/:id/approve", post(reviews::approve))
        .route("/api/site-config", get(site::get_config))
        .route("/api/admin/site-config", put(site::update_config))
        .route(
            "/api/admin/photographers/:id/approve",
            post(accounts::approve_photographer),
        )
        .route(
            "/api/admin/photographers/:id/reject",
            post(accounts::reject_photographer),
        )
        .route("/api/admin/users/:id/messages", post(accounts::send_message))
        .route("/api/admin/cache", get(admin::cache_stats))
        .route("/api/admin/cache/invalidate", post(admin::invalidate_cache))
}
