//! Router-level tests. The pool connects lazily and every route exercised
//! here is served from validation or a pre-seeded cache.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use studio_booking_web::cache::AppCache;
use studio_booking_web::config::Config;
use studio_booking_web::models::SiteConfig;
use studio_booking_web::notifications::{LogMailer, Mailer, NotificationDispatcher};
use studio_booking_web::pricing::PricingConfig;
use studio_booking_web::{build_router, AppState};

async fn app() -> Router {
    let config = Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://localhost/unused".to_string()),
        "STUDIO_NAME" => Some("Lens & Light".to_string()),
        _ => None,
    })
    .unwrap();
    let db = PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .unwrap();

    let cache = AppCache::new();
    cache
        .pricing
        .insert(
            AppCache::PRICING_KEY.to_string(),
            Arc::new(PricingConfig::default()),
        )
        .await;
    let site = SiteConfig {
        site_name: "Lens & Light".to_string(),
        ..SiteConfig::default()
    };
    cache
        .site
        .insert(AppCache::SITE_KEY.to_string(), Arc::new(site))
        .await;
    cache
        .reviews
        .insert(AppCache::review_listing_key(1), Arc::new(Vec::new()))
        .await;

    let notifier = NotificationDispatcher::new(Mailer::Log(LogMailer), config.render_context());
    build_router(AppState {
        db,
        cache,
        config: Arc::new(config),
        notifier,
    })
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn amount(json: &Value, field: &str) -> Decimal {
    json[field]["amount"].as_str().unwrap().parse().unwrap()
}

fn gold_manchester() -> Value {
    json!({
        "service_type": "photoshoot",
        "tier": "gold",
        "media_types": ["photo"],
        "number_of_people": 1,
        "parish": "Manchester",
        "add_ons": []
    })
}

#[tokio::test]
async fn health_check() {
    let response = app().await.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn quote_gold_photoshoot_in_manchester() {
    let response = app()
        .await
        .oneshot(post_json("/api/pricing/quote", gold_manchester()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(amount(&json, "base_price"), dec!(300));
    assert_eq!(amount(&json, "transportation_fee"), dec!(35));
    assert_eq!(amount(&json, "total_price"), dec!(335));
    assert_eq!(amount(&json, "deposit_amount"), dec!(168));
    assert_eq!(amount(&json, "balance_due"), dec!(167));
    assert_eq!(json["parish_group"], "near");
    assert_eq!(json["total_price"]["currency"], "USD");
}

#[tokio::test]
async fn quote_add_on_raises_total_by_its_price() {
    let mut request = gold_manchester();
    request["add_ons"] = json!(["drone_coverage"]);
    let response = app()
        .await
        .oneshot(post_json("/api/pricing/quote", request))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(amount(&json, "addons_total"), dec!(120));
    assert_eq!(amount(&json, "total_price"), dec!(455));
}

#[tokio::test]
async fn quote_unknown_tier_rejected() {
    let mut request = gold_manchester();
    request["tier"] = json!("diamond");
    let response = app()
        .await
        .oneshot(post_json("/api/pricing/quote", request))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["error_type"], "validation_error");
    assert!(json["message"].as_str().unwrap().contains("diamond"));
}

#[tokio::test]
async fn quote_unknown_add_on_rejected() {
    let mut request = gold_manchester();
    request["add_ons"] = json!(["hot_air_balloon"]);
    let response = app()
        .await
        .oneshot(post_json("/api/pricing/quote", request))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn pricing_config_served_from_cache() {
    let response = app().await.oneshot(get("/api/pricing/config")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["currency"], "USD");
}

#[tokio::test]
async fn parishes_listed_with_groups() {
    let response = app().await.oneshot(get("/api/pricing/parishes")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let parishes = json.as_array().unwrap();
    assert_eq!(parishes.len(), 14);
    assert!(parishes
        .iter()
        .any(|p| p["name"] == "St. James" && p["group"] == "resort_corridor"));
}

#[tokio::test]
async fn booking_with_blank_name_rejected() {
    let mut request = gold_manchester();
    request["client_name"] = json!("  ");
    request["client_email"] = json!("tanya@example.com");
    request["client_phone"] = json!("876-555-0101");
    request["location"] = json!("Mandeville");
    request["shoot_date"] = json!("2099-03-14");

    let response = app()
        .await
        .oneshot(post_json("/api/bookings", request))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["error_type"], "validation_error");
}

#[tokio::test]
async fn booking_with_unparseable_date_gets_json_error() {
    let mut request = gold_manchester();
    request["client_name"] = json!("Tanya Brown");
    request["shoot_date"] = json!("next friday");

    let response = app()
        .await
        .oneshot(post_json("/api/bookings", request))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["error_type"], "validation_error");
    assert!(json["message"].as_str().unwrap().contains("shoot_date"));
}

#[tokio::test]
async fn quote_without_service_type_gets_json_error() {
    let mut request = gold_manchester();
    request.as_object_mut().unwrap().remove("service_type");

    let response = app()
        .await
        .oneshot(post_json("/api/pricing/quote", request))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["error_type"], "validation_error");
}

#[tokio::test]
async fn site_config_served_from_cache() {
    let response = app().await.oneshot(get("/api/site-config")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["site_name"], "Lens & Light");
}

#[tokio::test]
async fn pricing_page_renders_table_and_theme() {
    let response = app().await.oneshot(get("/pricing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("USD 300.00"));
    assert!(html.contains("--primary-color: #1f2933;"));
    assert!(html.contains("Pricing | Lens &amp; Light"));
}

#[tokio::test]
async fn home_page_renders() {
    let response = app().await.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("From USD 150.00"));
}

#[tokio::test]
async fn contact_form_validation_and_submit() {
    let form = |body: &str| {
        Request::builder()
            .method("POST")
            .uri("/contact")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    };

    let response = app()
        .await
        .oneshot(form("name=Marcus&email=marcus%40example.com&message="))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("message"));

    let response = app()
        .await
        .oneshot(form(
            "name=Marcus&email=marcus%40example.com&phone=&message=Do+you+travel+to+Portland%3F",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Thank you, Marcus"));
}

#[tokio::test]
async fn review_with_bad_rating_rejected() {
    let response = app()
        .await
        .oneshot(post_json(
            "/api/reviews",
            json!({ "client_name": "Keisha", "rating": 9, "comment": "Great" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn cache_stats_reported() {
    let response = app().await.oneshot(get("/api/admin/cache")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["pricing_cached"], true);
    assert_eq!(json["site_cached"], true);
}
