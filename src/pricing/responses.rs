//! Response DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::{Quote, QuoteSelection};
use super::models::{MediaType, ParishGroup, ServiceType, Tier};

/// Money value for JSON responses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
}

impl MoneyResponse {
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self {
            amount,
            currency: currency.to_string(),
        }
    }
}

/// Response for a quote calculation
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub service_type: ServiceType,
    pub tier: Tier,
    pub media_types: Vec<MediaType>,
    pub number_of_people: u32,
    pub parish: String,
    pub parish_group: ParishGroup,
    pub add_ons: Vec<String>,
    pub photo_price: MoneyResponse,
    pub video_price: MoneyResponse,
    pub base_price: MoneyResponse,
    pub addons_total: MoneyResponse,
    pub transportation_fee: MoneyResponse,
    pub extra_people: u32,
    pub extra_person_fee: MoneyResponse,
    pub total_price: MoneyResponse,
    pub deposit_amount: MoneyResponse,
    pub balance_due: MoneyResponse,
}

impl QuoteResponse {
    pub fn new(selection: &QuoteSelection, quote: &Quote) -> Self {
        let currency = quote.currency.as_str();
        let mut media_types = Vec::with_capacity(2);
        if selection.include_photo {
            media_types.push(MediaType::Photo);
        }
        if selection.include_video {
            media_types.push(MediaType::Video);
        }

        Self {
            service_type: selection.service_type,
            tier: selection.tier,
            media_types,
            number_of_people: selection.number_of_people,
            parish: selection.parish.name().to_string(),
            parish_group: selection.parish.group(),
            add_ons: selection.add_ons.clone(),
            photo_price: MoneyResponse::new(quote.photo_price, currency),
            video_price: MoneyResponse::new(quote.video_price, currency),
            base_price: MoneyResponse::new(quote.base_price, currency),
            addons_total: MoneyResponse::new(quote.addons_total, currency),
            transportation_fee: MoneyResponse::new(quote.transportation_fee, currency),
            extra_people: quote.extra_people,
            extra_person_fee: MoneyResponse::new(quote.extra_person_fee, currency),
            total_price: MoneyResponse::new(quote.total_price, currency),
            deposit_amount: MoneyResponse::new(quote.deposit_amount, currency),
            balance_due: MoneyResponse::new(quote.balance_due, currency),
        }
    }
}
