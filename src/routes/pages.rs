//! Server-rendered marketing pages

use std::sync::Arc;

use askama::Template;
use axum::{extract::State, http::StatusCode, response::Html, Form};
use rust_decimal::Decimal;

use crate::db;
use crate::error::{AppError, Result};
use crate::models::{ContactForm, Review, SiteConfig};
use crate::notifications::{events::format_money, NotificationEvent};
use crate::pricing::calculators::DEPOSIT_RATE;
use crate::pricing::services::active_config;
use crate::pricing::{Parish, ParishGroup, PricingConfig, ServiceType, Tier};
use crate::AppState;

/// Service card on the homepage
struct ServiceCard {
    label: &'static str,
    from_price: String,
}

/// Review as shown on the homepage
struct ReviewCard {
    client_name: String,
    comment: String,
    stars: String,
}

impl From<&Review> for ReviewCard {
    fn from(review: &Review) -> Self {
        let filled = review.rating.clamp(0, 5) as usize;
        Self {
            client_name: review.client_name.clone(),
            comment: review.comment.clone(),
            stars: format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled)),
        }
    }
}

struct PriceRow {
    tier: &'static str,
    photo_price: String,
    duration_hours: String,
    image_count: String,
    location_count: String,
    included_people: String,
    video_price: String,
}

struct ServiceTable {
    label: &'static str,
    rows: Vec<PriceRow>,
}

struct PriceLine {
    label: String,
    price: String,
}

#[derive(Template)]
#[template(path = "pages/home.html")]
struct HomeTemplate {
    page_title: String,
    site: Arc<SiteConfig>,
    services: Vec<ServiceCard>,
    reviews: Vec<ReviewCard>,
}

#[derive(Template)]
#[template(path = "pages/about.html")]
struct AboutTemplate {
    page_title: String,
    site: Arc<SiteConfig>,
}

#[derive(Template)]
#[template(path = "pages/contact.html")]
struct ContactTemplate {
    page_title: String,
    site: Arc<SiteConfig>,
    form: ContactForm,
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "pages/contact_sent.html")]
struct ContactSentTemplate {
    page_title: String,
    site: Arc<SiteConfig>,
    name: String,
}

#[derive(Template)]
#[template(path = "pages/pricing.html")]
struct PricingTemplate {
    page_title: String,
    site: Arc<SiteConfig>,
    currency: String,
    deposit_percent: Decimal,
    services: Vec<ServiceTable>,
    add_ons: Vec<PriceLine>,
    transportation: Vec<PriceLine>,
    additional_person_fee: String,
}

const HOME_REVIEWS: usize = 3;

/// Homepage handler
pub async fn home(State(state): State<AppState>) -> Result<Html<String>> {
    let site = db::site_config(&state.db, &state.cache).await?;
    let config = active_config(&state.db, &state.cache)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let reviews = db::approved_reviews(&state.db, &state.cache, 1).await?;

    let template = HomeTemplate {
        page_title: site.page_title(""),
        services: service_cards(&config),
        reviews: reviews.iter().take(HOME_REVIEWS).map(ReviewCard::from).collect(),
        site,
    };
    Ok(Html(template.render()?))
}

/// About page
pub async fn about(State(state): State<AppState>) -> Result<Html<String>> {
    let site = db::site_config(&state.db, &state.cache).await?;
    let template = AboutTemplate {
        page_title: site.page_title("About"),
        site,
    };
    Ok(Html(template.render()?))
}

/// Contact form
pub async fn contact(State(state): State<AppState>) -> Result<Html<String>> {
    let site = db::site_config(&state.db, &state.cache).await?;
    let template = ContactTemplate {
        page_title: site.page_title("Contact"),
        site,
        form: ContactForm::default(),
        error: None,
    };
    Ok(Html(template.render()?))
}

/// Contact form submission. Forwards the message to the studio inbox.
pub async fn submit_contact(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> Result<(StatusCode, Html<String>)> {
    let site = db::site_config(&state.db, &state.cache).await?;

    let message = match form.validate() {
        Ok(message) => message,
        Err(e) => {
            let template = ContactTemplate {
                page_title: site.page_title("Contact"),
                site,
                error: Some(e.to_string()),
                form,
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(template.render()?)));
        }
    };

    tracing::info!(from = %message.email, "Contact form submitted");
    state.notifier.dispatch(
        &state.config.studio_inbox,
        NotificationEvent::ContactReceived {
            name: message.name.clone(),
            email: message.email,
            phone: message.phone,
            message: message.message,
        },
    );

    let template = ContactSentTemplate {
        page_title: site.page_title("Contact"),
        site,
        name: message.name,
    };
    Ok((StatusCode::OK, Html(template.render()?)))
}

/// Pricing page rendered from the active price table
pub async fn pricing_page(State(state): State<AppState>) -> Result<Html<String>> {
    let site = db::site_config(&state.db, &state.cache).await?;
    let config = active_config(&state.db, &state.cache)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let template = PricingTemplate {
        page_title: site.page_title("Pricing"),
        site,
        currency: config.currency.clone(),
        deposit_percent: (DEPOSIT_RATE * Decimal::ONE_HUNDRED).normalize(),
        services: service_tables(&config),
        add_ons: add_on_lines(&config),
        transportation: transportation_lines(&config),
        additional_person_fee: format_money(config.additional_person_fee, &config.currency),
    };
    Ok(Html(template.render()?))
}

fn service_cards(config: &PricingConfig) -> Vec<ServiceCard> {
    ServiceType::ALL
        .iter()
        .filter_map(|&service_type| {
            let cheapest = Tier::ALL
                .iter()
                .filter_map(|&tier| config.photo_package(service_type, tier).ok())
                .map(|p| p.price)
                .min()?;
            Some(ServiceCard {
                label: service_type.label(),
                from_price: format_money(cheapest, &config.currency),
            })
        })
        .collect()
}

fn service_tables(config: &PricingConfig) -> Vec<ServiceTable> {
    let dash = || "-".to_string();
    ServiceType::ALL
        .iter()
        .map(|&service_type| ServiceTable {
            label: service_type.label(),
            rows: Tier::ALL
                .iter()
                .map(|&tier| {
                    let package = config.photo_package(service_type, tier).ok();
                    let video = config.video_price(service_type, tier).ok();
                    PriceRow {
                        tier: tier.label(),
                        photo_price: package
                            .map(|p| format_money(p.price, &config.currency))
                            .unwrap_or_else(dash),
                        duration_hours: package
                            .map(|p| p.duration_hours.to_string())
                            .unwrap_or_else(dash),
                        image_count: package.map(|p| p.image_count.to_string()).unwrap_or_else(dash),
                        location_count: package
                            .map(|p| p.location_count.to_string())
                            .unwrap_or_else(dash),
                        included_people: package
                            .map(|p| p.included_people.to_string())
                            .unwrap_or_else(dash),
                        video_price: video
                            .map(|v| format_money(v, &config.currency))
                            .unwrap_or_else(dash),
                    }
                })
                .collect(),
        })
        .collect()
}

fn add_on_lines(config: &PricingConfig) -> Vec<PriceLine> {
    config
        .add_ons
        .iter()
        .map(|(name, price)| PriceLine {
            label: humanize(name),
            price: format_money(*price, &config.currency),
        })
        .collect()
}

fn transportation_lines(config: &PricingConfig) -> Vec<PriceLine> {
    ParishGroup::ALL
        .iter()
        .filter_map(|&group| {
            let fee = config.transportation_fee(group).ok()?;
            let parishes: Vec<&str> = Parish::ALL
                .iter()
                .filter(|p| p.group() == group)
                .map(|p| p.name())
                .collect();
            Some(PriceLine {
                label: parishes.join(", "),
                price: format_money(fee, &config.currency),
            })
        })
        .collect()
}

/// `rush_editing` -> `Rush editing`
fn humanize(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("rush_editing"), "Rush editing");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn test_service_cards_use_cheapest_tier() {
        let cards = service_cards(&PricingConfig::default());
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].from_price, "USD 150.00");
        assert_eq!(cards[1].from_price, "USD 900.00");
    }

    #[test]
    fn test_transportation_lines_cover_every_parish() {
        let lines = transportation_lines(&PricingConfig::default());
        let listed: usize = lines.iter().map(|l| l.label.split(", ").count()).sum();
        assert_eq!(listed, Parish::ALL.len());
        assert_eq!(lines[0].price, "USD 35.00");
    }

    #[test]
    fn test_pricing_table_has_every_tier() {
        let tables = service_tables(&PricingConfig::default());
        assert!(tables.iter().all(|t| t.rows.len() == Tier::ALL.len()));
        assert_eq!(tables[0].rows[2].photo_price, "USD 300.00");
        assert_eq!(tables[0].rows[2].video_price, "USD 400.00");
    }

    #[test]
    fn test_review_stars() {
        let review = Review {
            id: uuid::Uuid::nil(),
            client_name: "Keisha".to_string(),
            rating: 4,
            comment: "Lovely".to_string(),
            service_type: None,
            approved: true,
            created_at: chrono::Utc::now(),
        };
        assert_eq!(ReviewCard::from(&review).stars, "★★★★☆");
    }
}
