//! Pricing engine module.
//!
//! Package prices by service type, tier and media, plus add-ons, extra
//! people and parish transportation fees. The calculator is pure; the
//! service layer only supplies the active price table.

pub mod calculators;
pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{calculate_quote, round_money, split_deposit, Quote, QuoteSelection};
pub use models::{MediaType, Parish, ParishGroup, PricingConfig, ServiceType, Tier};
pub use routes::router;
pub use services::PricingError;
