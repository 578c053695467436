//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no database access. Every lookup is
//! resolved before any arithmetic so a bad selection never yields a partial
//! total.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::error::ValidationError;

use super::models::{Parish, PricingConfig, ServiceType, Tier};
use super::services::PricingError;

/// Share of the total collected at booking time.
pub const DEPOSIT_RATE: Decimal = dec!(0.5);

/// Round to the given number of decimal places, halves away from zero.
///
/// Money in this service is never negative, so this is round-half-up. It is
/// the single rounding policy used for deposits.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use studio_booking_web::pricing::round_money;
///
/// assert_eq!(round_money(dec!(167.5), 0), dec!(168));
/// assert_eq!(round_money(dec!(75.5), 0), dec!(76));
/// assert_eq!(round_money(dec!(1.005), 2), dec!(1.01));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Split a total into (deposit, balance). The parts always sum to `total`.
pub fn split_deposit(total: Decimal, places: u32) -> (Decimal, Decimal) {
    let deposit = round_money(total * DEPOSIT_RATE, places);
    (deposit, total - deposit)
}

/// A validated set of client choices
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteSelection {
    pub service_type: ServiceType,
    pub tier: Tier,
    pub include_photo: bool,
    pub include_video: bool,
    pub number_of_people: u32,
    pub parish: Parish,
    pub add_ons: Vec<String>,
}

/// Computed price breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub photo_price: Decimal,
    pub video_price: Decimal,
    pub base_price: Decimal,
    pub addons_total: Decimal,
    pub transportation_fee: Decimal,
    pub extra_people: u32,
    pub extra_person_fee: Decimal,
    pub total_price: Decimal,
    pub deposit_amount: Decimal,
    pub balance_due: Decimal,
    pub currency: String,
}

/// Price a selection against the config.
pub fn calculate_quote(
    config: &PricingConfig,
    selection: &QuoteSelection,
) -> Result<Quote, PricingError> {
    if !selection.include_photo && !selection.include_video {
        return Err(ValidationError::NoMediaSelected.into());
    }
    if selection.number_of_people == 0 {
        return Err(ValidationError::InvalidHeadCount(0).into());
    }

    // Resolve all lookups first
    let package = config.photo_package(selection.service_type, selection.tier)?;
    let video_price = if selection.include_video {
        config.video_price(selection.service_type, selection.tier)?
    } else {
        Decimal::ZERO
    };
    let add_on_prices = selection
        .add_ons
        .iter()
        .map(|name| config.add_on_price(name))
        .collect::<Result<Vec<_>, _>>()?;
    let transportation_fee = config.transportation_fee(selection.parish.group())?;

    let photo_price = if selection.include_photo {
        package.price
    } else {
        Decimal::ZERO
    };
    let base_price = photo_price + video_price;

    let extra_people = selection
        .number_of_people
        .saturating_sub(package.included_people);
    let extra_person_fee = config.additional_person_fee * Decimal::from(extra_people);

    let addons_total: Decimal = add_on_prices.iter().sum();

    let total_price = base_price + extra_person_fee + addons_total + transportation_fee;
    let (deposit_amount, balance_due) = split_deposit(total_price, config.rounding_places);

    Ok(Quote {
        photo_price,
        video_price,
        base_price,
        addons_total,
        transportation_fee,
        extra_people,
        extra_person_fee,
        total_price,
        deposit_amount,
        balance_due,
        currency: config.currency.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::models::ParishGroup;

    fn selection(service_type: ServiceType, tier: Tier) -> QuoteSelection {
        QuoteSelection {
            service_type,
            tier,
            include_photo: true,
            include_video: false,
            number_of_people: 1,
            parish: Parish::Manchester,
            add_ons: vec![],
        }
    }

    // ==================== round_money tests ====================

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(dec!(167.5), 0), dec!(168));
        assert_eq!(round_money(dec!(168.5), 0), dec!(169)); // not to even
        assert_eq!(round_money(dec!(2.5), 0), dec!(3));
        assert_eq!(round_money(dec!(2.4999), 0), dec!(2));
    }

    #[test]
    fn test_round_money_decimal_places() {
        assert_eq!(round_money(dec!(2.25), 1), dec!(2.3));
        assert_eq!(round_money(dec!(1.005), 2), dec!(1.01));
        assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
    }

    #[test]
    fn test_round_money_zero() {
        assert_eq!(round_money(dec!(0), 0), dec!(0));
    }

    // ==================== split_deposit tests ====================

    #[test]
    fn test_split_deposit_odd_total() {
        assert_eq!(split_deposit(dec!(151), 0), (dec!(76), dec!(75)));
        assert_eq!(split_deposit(dec!(335), 0), (dec!(168), dec!(167)));
    }

    #[test]
    fn test_split_deposit_even_total() {
        assert_eq!(split_deposit(dec!(300), 0), (dec!(150), dec!(150)));
    }

    #[test]
    fn test_split_deposit_minor_units() {
        assert_eq!(split_deposit(dec!(100.01), 2), (dec!(50.01), dec!(50.00)));
    }

    // ==================== calculate_quote tests ====================

    #[test]
    fn test_photoshoot_gold_manchester() {
        let config = PricingConfig::default();
        let quote = calculate_quote(&config, &selection(ServiceType::Photoshoot, Tier::Gold)).unwrap();

        assert_eq!(quote.base_price, dec!(300));
        assert_eq!(quote.transportation_fee, dec!(35));
        assert_eq!(quote.extra_person_fee, dec!(0));
        assert_eq!(quote.addons_total, dec!(0));
        assert_eq!(quote.total_price, dec!(335));
        assert_eq!(quote.deposit_amount, dec!(168));
        assert_eq!(quote.balance_due, dec!(167));
        assert_eq!(quote.currency, "USD");
    }

    #[test]
    fn test_deposit_plus_balance_is_total_for_every_package() {
        let config = PricingConfig::default();
        for service_type in ServiceType::ALL {
            for tier in Tier::ALL {
                for (photo, video) in [(true, false), (false, true), (true, true)] {
                    for parish in Parish::ALL {
                        let mut sel = selection(service_type, tier);
                        sel.include_photo = photo;
                        sel.include_video = video;
                        sel.parish = parish;
                        sel.number_of_people = 3;
                        let q = calculate_quote(&config, &sel).unwrap();
                        assert_eq!(q.deposit_amount + q.balance_due, q.total_price);
                        assert_eq!(q.deposit_amount, round_money(q.total_price * dec!(0.5), 0));
                    }
                }
            }
        }
    }

    #[test]
    fn test_video_adds_tier_price() {
        let config = PricingConfig::default();
        let mut sel = selection(ServiceType::Wedding, Tier::Silver);
        let photo_only = calculate_quote(&config, &sel).unwrap();
        sel.include_video = true;
        let both = calculate_quote(&config, &sel).unwrap();

        assert_eq!(both.video_price, dec!(1500));
        assert_eq!(both.total_price - photo_only.total_price, dec!(1500));
        assert_eq!(both.base_price, dec!(2800));
    }

    #[test]
    fn test_video_only() {
        let config = PricingConfig::default();
        let mut sel = selection(ServiceType::Event, Tier::Bronze);
        sel.include_photo = false;
        sel.include_video = true;
        let quote = calculate_quote(&config, &sel).unwrap();

        assert_eq!(quote.photo_price, dec!(0));
        assert_eq!(quote.base_price, dec!(300));
        assert_eq!(quote.total_price, dec!(335));
    }

    #[test]
    fn test_no_media_rejected() {
        let config = PricingConfig::default();
        let mut sel = selection(ServiceType::Photoshoot, Tier::Gold);
        sel.include_photo = false;
        assert!(matches!(
            calculate_quote(&config, &sel),
            Err(PricingError::Validation(ValidationError::NoMediaSelected))
        ));
    }

    #[test]
    fn test_add_on_increases_total_by_its_price() {
        let config = PricingConfig::default();
        let mut sel = selection(ServiceType::Photoshoot, Tier::Silver);
        let without = calculate_quote(&config, &sel).unwrap();
        sel.add_ons = vec!["printed_album".to_string()];
        let with = calculate_quote(&config, &sel).unwrap();

        assert_eq!(with.total_price - without.total_price, dec!(150));
        assert_eq!(with.addons_total, dec!(150));
        assert_eq!(with.base_price, without.base_price);
        assert_eq!(with.transportation_fee, without.transportation_fee);
        assert_eq!(with.extra_person_fee, without.extra_person_fee);
    }

    #[test]
    fn test_extra_people_fee() {
        let config = PricingConfig::default();
        // Gold photoshoot includes 2 people
        let mut sel = selection(ServiceType::Photoshoot, Tier::Gold);
        sel.number_of_people = 2;
        let included = calculate_quote(&config, &sel).unwrap();
        assert_eq!(included.extra_person_fee, dec!(0));

        sel.number_of_people = 5;
        let extra = calculate_quote(&config, &sel).unwrap();
        assert_eq!(extra.extra_people, 3);
        assert_eq!(extra.extra_person_fee, dec!(75));
        assert_eq!(extra.total_price - included.total_price, dec!(75));
    }

    #[test]
    fn test_transportation_bands() {
        let config = PricingConfig::default();
        let mut sel = selection(ServiceType::Photoshoot, Tier::Bronze);

        sel.parish = Parish::StJames;
        assert_eq!(calculate_quote(&config, &sel).unwrap().transportation_fee, dec!(60));

        sel.parish = Parish::Portland;
        assert_eq!(calculate_quote(&config, &sel).unwrap().transportation_fee, dec!(50));
    }

    #[test]
    fn test_unknown_add_on_returns_no_total() {
        let config = PricingConfig::default();
        let mut sel = selection(ServiceType::Photoshoot, Tier::Gold);
        sel.add_ons = vec!["extra_hour".to_string(), "fireworks".to_string()];
        assert!(matches!(
            calculate_quote(&config, &sel),
            Err(PricingError::Validation(ValidationError::UnknownAddOn(name))) if name == "fireworks"
        ));
    }

    #[test]
    fn test_missing_config_entry() {
        let mut config = PricingConfig::default();
        config.transportation.remove(&ParishGroup::Near);
        assert!(matches!(
            calculate_quote(&config, &selection(ServiceType::Photoshoot, Tier::Gold)),
            Err(PricingError::MissingTransportationFee(ParishGroup::Near))
        ));
    }

    #[test]
    fn test_rounding_places_from_config() {
        let mut config = PricingConfig::default();
        config.rounding_places = 2;
        config.additional_person_fee = dec!(12.25);
        let mut sel = selection(ServiceType::Photoshoot, Tier::Bronze);
        sel.number_of_people = 2;
        // 150 + 12.25 + 35 = 197.25 -> deposit 98.625 -> 98.63
        let quote = calculate_quote(&config, &sel).unwrap();
        assert_eq!(quote.total_price, dec!(197.25));
        assert_eq!(quote.deposit_amount, dec!(98.63));
        assert_eq!(quote.balance_due, dec!(98.62));
    }
}
