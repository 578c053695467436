//! Pricing catalog types.
//!
//! The enumerated selections a client can make (service type, tier, media,
//! parish) and the `PricingConfig` table they are priced against. The config
//! is stored as a JSON blob in `pricing_configs` and loaded through sqlx.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::ValidationError;

use super::services::PricingError;

/// Kind of shoot being booked
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "service_type", rename_all = "lowercase")]
pub enum ServiceType {
    Photoshoot,
    Wedding,
    Event,
}

impl ServiceType {
    pub const ALL: [ServiceType; 3] = [
        ServiceType::Photoshoot,
        ServiceType::Wedding,
        ServiceType::Event,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Photoshoot => "photoshoot",
            ServiceType::Wedding => "wedding",
            ServiceType::Event => "event",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ServiceType::Photoshoot => "Photoshoot",
            ServiceType::Wedding => "Wedding",
            ServiceType::Event => "Event",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "photoshoot" => Ok(ServiceType::Photoshoot),
            "wedding" => Ok(ServiceType::Wedding),
            "event" => Ok(ServiceType::Event),
            _ => Err(ValidationError::UnknownServiceType(s.to_string())),
        }
    }
}

/// Package level
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "package_tier", rename_all = "lowercase")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Bronze, Tier::Silver, Tier::Gold, Tier::Platinum];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Bronze => "bronze",
            Tier::Silver => "silver",
            Tier::Gold => "gold",
            Tier::Platinum => "platinum",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Bronze => "Bronze",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
            Tier::Platinum => "Platinum",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bronze" => Ok(Tier::Bronze),
            "silver" => Ok(Tier::Silver),
            "gold" => Ok(Tier::Gold),
            "platinum" => Ok(Tier::Platinum),
            _ => Err(ValidationError::UnknownTier(s.to_string())),
        }
    }
}

/// Photography and/or videography coverage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Photo,
    Video,
}

impl FromStr for MediaType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "photo" | "photography" => Ok(MediaType::Photo),
            "video" | "videography" => Ok(MediaType::Video),
            _ => Err(ValidationError::UnknownMediaType(s.to_string())),
        }
    }
}

/// Transportation fee band
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ParishGroup {
    Near,
    ResortCorridor,
    Other,
}

impl ParishGroup {
    pub const ALL: [ParishGroup; 3] = [
        ParishGroup::Near,
        ParishGroup::ResortCorridor,
        ParishGroup::Other,
    ];
}

impl fmt::Display for ParishGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParishGroup::Near => "near",
            ParishGroup::ResortCorridor => "resort_corridor",
            ParishGroup::Other => "other",
        })
    }
}

/// Jamaican parish where the shoot takes place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parish {
    Kingston,
    StAndrew,
    StThomas,
    Portland,
    StMary,
    StAnn,
    Trelawny,
    StJames,
    Hanover,
    Westmoreland,
    StElizabeth,
    Manchester,
    Clarendon,
    StCatherine,
}

impl Parish {
    pub const ALL: [Parish; 14] = [
        Parish::Kingston,
        Parish::StAndrew,
        Parish::StThomas,
        Parish::Portland,
        Parish::StMary,
        Parish::StAnn,
        Parish::Trelawny,
        Parish::StJames,
        Parish::Hanover,
        Parish::Westmoreland,
        Parish::StElizabeth,
        Parish::Manchester,
        Parish::Clarendon,
        Parish::StCatherine,
    ];

    /// Display name, as stored on booking rows
    pub fn name(&self) -> &'static str {
        match self {
            Parish::Kingston => "Kingston",
            Parish::StAndrew => "St. Andrew",
            Parish::StThomas => "St. Thomas",
            Parish::Portland => "Portland",
            Parish::StMary => "St. Mary",
            Parish::StAnn => "St. Ann",
            Parish::Trelawny => "Trelawny",
            Parish::StJames => "St. James",
            Parish::Hanover => "Hanover",
            Parish::Westmoreland => "Westmoreland",
            Parish::StElizabeth => "St. Elizabeth",
            Parish::Manchester => "Manchester",
            Parish::Clarendon => "Clarendon",
            Parish::StCatherine => "St. Catherine",
        }
    }

    /// Transportation band. The studio is based in Manchester.
    pub fn group(&self) -> ParishGroup {
        match self {
            Parish::Manchester | Parish::Clarendon | Parish::StElizabeth | Parish::StCatherine => {
                ParishGroup::Near
            }
            Parish::StAnn
            | Parish::Trelawny
            | Parish::StJames
            | Parish::Hanover
            | Parish::Westmoreland => ParishGroup::ResortCorridor,
            Parish::Kingston
            | Parish::StAndrew
            | Parish::StThomas
            | Parish::Portland
            | Parish::StMary => ParishGroup::Other,
        }
    }
}

impl fmt::Display for Parish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Parish {
    type Err = ValidationError;

    /// Accepts "St. Ann", "Saint Ann", "st_ann", "ST-ANN" and so on.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s
            .to_lowercase()
            .chars()
            .map(|c| match c {
                '.' => ' ',
                '_' | '-' => ' ',
                other => other,
            })
            .collect();
        let words: Vec<&str> = cleaned
            .split_whitespace()
            .map(|w| if w == "saint" { "st" } else { w })
            .collect();

        let parish = match words.join(" ").as_str() {
            "kingston" => Parish::Kingston,
            "st andrew" => Parish::StAndrew,
            "st thomas" => Parish::StThomas,
            "portland" => Parish::Portland,
            "st mary" => Parish::StMary,
            "st ann" => Parish::StAnn,
            "trelawny" => Parish::Trelawny,
            "st james" => Parish::StJames,
            "hanover" => Parish::Hanover,
            "westmoreland" => Parish::Westmoreland,
            "st elizabeth" => Parish::StElizabeth,
            "manchester" => Parish::Manchester,
            "clarendon" => Parish::Clarendon,
            "st catherine" => Parish::StCatherine,
            _ => return Err(ValidationError::UnknownParish(s.to_string())),
        };
        Ok(parish)
    }
}

/// Photography package details for one (service type, tier) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoPackage {
    pub price: Decimal,
    pub duration_hours: u32,
    pub image_count: u32,
    pub location_count: u32,
    pub included_people: u32,
}

/// The full price table. Read-only for the lifetime of a request; admin
/// updates replace the whole value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub currency: String,
    pub photography: BTreeMap<ServiceType, BTreeMap<Tier, PhotoPackage>>,
    pub videography: BTreeMap<ServiceType, BTreeMap<Tier, Decimal>>,
    pub add_ons: BTreeMap<String, Decimal>,
    pub transportation: BTreeMap<ParishGroup, Decimal>,
    pub additional_person_fee: Decimal,
    /// Decimal places deposits are rounded to (0 = whole currency units)
    #[serde(default)]
    pub rounding_places: u32,
}

impl PricingConfig {
    pub fn photo_package(
        &self,
        service_type: ServiceType,
        tier: Tier,
    ) -> Result<&PhotoPackage, PricingError> {
        self.photography
            .get(&service_type)
            .and_then(|tiers| tiers.get(&tier))
            .ok_or(PricingError::MissingPrice {
                kind: "photography",
                service_type,
                tier,
            })
    }

    pub fn video_price(&self, service_type: ServiceType, tier: Tier) -> Result<Decimal, PricingError> {
        self.videography
            .get(&service_type)
            .and_then(|tiers| tiers.get(&tier))
            .copied()
            .ok_or(PricingError::MissingPrice {
                kind: "videography",
                service_type,
                tier,
            })
    }

    /// Add-on names are the configured keys; anything else is invalid input.
    pub fn add_on_price(&self, name: &str) -> Result<Decimal, PricingError> {
        self.add_ons
            .get(name)
            .copied()
            .ok_or_else(|| ValidationError::UnknownAddOn(name.to_string()).into())
    }

    pub fn transportation_fee(&self, group: ParishGroup) -> Result<Decimal, PricingError> {
        self.transportation
            .get(&group)
            .copied()
            .ok_or(PricingError::MissingTransportationFee(group))
    }

    /// Check that every lookup the calculator can make will succeed and that
    /// every amount fits a two-place money column.
    pub fn validate(&self) -> Result<(), PricingError> {
        let mut errors = Vec::new();

        if self.currency.trim().is_empty() {
            errors.push("currency is empty".to_string());
        }
        for service_type in ServiceType::ALL {
            for tier in Tier::ALL {
                match self.photo_package(service_type, tier) {
                    Ok(package) => check_money(
                        &mut errors,
                        &format!("photography.{service_type}.{tier}"),
                        package.price,
                    ),
                    Err(_) => errors.push(format!("photography.{service_type}.{tier} missing")),
                }
                match self.video_price(service_type, tier) {
                    Ok(price) => check_money(
                        &mut errors,
                        &format!("videography.{service_type}.{tier}"),
                        price,
                    ),
                    Err(_) => errors.push(format!("videography.{service_type}.{tier} missing")),
                }
            }
        }
        for group in ParishGroup::ALL {
            match self.transportation.get(&group) {
                Some(fee) => check_money(&mut errors, &format!("transportation.{group}"), *fee),
                None => errors.push(format!("transportation.{group} missing")),
            }
        }
        for (name, price) in &self.add_ons {
            // Request add-ons are trimmed and lowercased before lookup
            if name.is_empty() || name.trim() != name || name.to_lowercase() != *name {
                errors.push(format!("add_ons key '{name}' must be trimmed lowercase"));
            }
            check_money(&mut errors, &format!("add_ons.{name}"), *price);
        }
        check_money(&mut errors, "additional_person_fee", self.additional_person_fee);
        if self.rounding_places > MONEY_SCALE {
            errors.push(format!("rounding_places must be at most {MONEY_SCALE}"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PricingError::ConfigurationError {
                message: format!("{} problem(s) in pricing config", errors.len()),
                errors,
            })
        }
    }
}

/// Decimal places of the stored money columns
pub const MONEY_SCALE: u32 = 2;

fn check_money(errors: &mut Vec<String>, field: &str, amount: Decimal) {
    if amount < Decimal::ZERO {
        errors.push(format!("{field} is negative"));
    }
    if amount.normalize().scale() > MONEY_SCALE {
        errors.push(format!("{field} has more than {MONEY_SCALE} decimal places"));
    }
}

fn package(
    price: Decimal,
    duration_hours: u32,
    image_count: u32,
    location_count: u32,
    included_people: u32,
) -> PhotoPackage {
    PhotoPackage {
        price,
        duration_hours,
        image_count,
        location_count,
        included_people,
    }
}

impl Default for PricingConfig {
    /// Built-in studio price list, used until an admin saves one.
    fn default() -> Self {
        let photography = BTreeMap::from([
            (
                ServiceType::Photoshoot,
                BTreeMap::from([
                    (Tier::Bronze, package(dec!(150), 1, 10, 1, 1)),
                    (Tier::Silver, package(dec!(225), 2, 20, 1, 2)),
                    (Tier::Gold, package(dec!(300), 3, 35, 2, 2)),
                    (Tier::Platinum, package(dec!(450), 4, 50, 3, 4)),
                ]),
            ),
            (
                ServiceType::Wedding,
                BTreeMap::from([
                    (Tier::Bronze, package(dec!(900), 4, 150, 1, 2)),
                    (Tier::Silver, package(dec!(1300), 6, 250, 2, 2)),
                    (Tier::Gold, package(dec!(1800), 8, 400, 2, 2)),
                    (Tier::Platinum, package(dec!(2500), 10, 600, 3, 2)),
                ]),
            ),
            (
                ServiceType::Event,
                BTreeMap::from([
                    (Tier::Bronze, package(dec!(250), 2, 50, 1, 25)),
                    (Tier::Silver, package(dec!(400), 3, 100, 1, 50)),
                    (Tier::Gold, package(dec!(550), 5, 150, 2, 100)),
                    (Tier::Platinum, package(dec!(800), 8, 250, 2, 200)),
                ]),
            ),
        ]);

        let videography = BTreeMap::from([
            (
                ServiceType::Photoshoot,
                BTreeMap::from([
                    (Tier::Bronze, dec!(200)),
                    (Tier::Silver, dec!(300)),
                    (Tier::Gold, dec!(400)),
                    (Tier::Platinum, dec!(550)),
                ]),
            ),
            (
                ServiceType::Wedding,
                BTreeMap::from([
                    (Tier::Bronze, dec!(1000)),
                    (Tier::Silver, dec!(1500)),
                    (Tier::Gold, dec!(2100)),
                    (Tier::Platinum, dec!(2900)),
                ]),
            ),
            (
                ServiceType::Event,
                BTreeMap::from([
                    (Tier::Bronze, dec!(300)),
                    (Tier::Silver, dec!(450)),
                    (Tier::Gold, dec!(650)),
                    (Tier::Platinum, dec!(900)),
                ]),
            ),
        ]);

        let add_ons = BTreeMap::from([
            ("extra_hour".to_string(), dec!(75)),
            ("extra_location".to_string(), dec!(40)),
            ("rush_editing".to_string(), dec!(60)),
            ("printed_album".to_string(), dec!(150)),
            ("drone_coverage".to_string(), dec!(120)),
            ("makeup_artist".to_string(), dec!(85)),
            ("additional_edited_images".to_string(), dec!(50)),
        ]);

        let transportation = BTreeMap::from([
            (ParishGroup::Near, dec!(35)),
            (ParishGroup::ResortCorridor, dec!(60)),
            (ParishGroup::Other, dec!(50)),
        ]);

        Self {
            currency: "USD".to_string(),
            photography,
            videography,
            add_ons,
            transportation,
            additional_person_fee: dec!(25),
            rounding_places: 0,
        }
    }
}

/// Saved config row from pricing_configs (latest row wins)
#[derive(Debug, Clone, FromRow)]
pub struct PricingConfigRow {
    pub id: i32,
    pub config: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl PricingConfigRow {
    pub fn parse(self) -> Result<PricingConfig, PricingError> {
        serde_json::from_value(self.config).map_err(|e| PricingError::ConfigurationError {
            message: format!("Pricing config {} is not valid JSON for the schema", self.id),
            errors: vec![e.to_string()],
        })
    }
}
