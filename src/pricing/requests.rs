//! Request DTOs for pricing API endpoints.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::ValidationError;

use super::calculators::QuoteSelection;
use super::models::{MediaType, Parish, ServiceType, Tier};

/// Request to price a package selection
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRequest {
    pub service_type: String,
    pub tier: String,
    pub media_types: Vec<String>,
    #[serde(default = "default_people")]
    pub number_of_people: i32,
    pub parish: String,
    #[serde(default)]
    pub add_ons: Vec<String>,
}

fn default_people() -> i32 {
    1
}

impl QuoteRequest {
    /// Check every enumerated value. Add-on names are checked against the
    /// active config by the calculator.
    pub fn validate(&self) -> Result<QuoteSelection, ValidationError> {
        let service_type: ServiceType = self.service_type.parse()?;
        let tier: Tier = self.tier.parse()?;

        let mut include_photo = false;
        let mut include_video = false;
        for media in &self.media_types {
            match media.parse::<MediaType>()? {
                MediaType::Photo => include_photo = true,
                MediaType::Video => include_video = true,
            }
        }
        if !include_photo && !include_video {
            return Err(ValidationError::NoMediaSelected);
        }

        if self.number_of_people < 1 {
            return Err(ValidationError::InvalidHeadCount(self.number_of_people));
        }

        let parish: Parish = self.parish.parse()?;

        let mut seen = HashSet::new();
        let mut add_ons = Vec::with_capacity(self.add_ons.len());
        for name in &self.add_ons {
            let key = name.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            if !seen.insert(key.clone()) {
                return Err(ValidationError::DuplicateAddOn(key));
            }
            add_ons.push(key);
        }

        Ok(QuoteSelection {
            service_type,
            tier,
            include_photo,
            include_video,
            number_of_people: self.number_of_people as u32,
            parish,
            add_ons,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> QuoteRequest {
        QuoteRequest {
            service_type: "photoshoot".to_string(),
            tier: "gold".to_string(),
            media_types: vec!["photo".to_string()],
            number_of_people: 1,
            parish: "Manchester".to_string(),
            add_ons: vec![],
        }
    }

    #[test]
    fn test_valid_request() {
        let selection = request().validate().unwrap();
        assert_eq!(selection.service_type, ServiceType::Photoshoot);
        assert_eq!(selection.tier, Tier::Gold);
        assert!(selection.include_photo);
        assert!(!selection.include_video);
        assert_eq!(selection.parish, Parish::Manchester);
    }

    #[test]
    fn test_unknown_tier() {
        let mut req = request();
        req.tier = "diamond".to_string();
        assert_eq!(
            req.validate().unwrap_err(),
            ValidationError::UnknownTier("diamond".to_string())
        );
    }

    #[test]
    fn test_unknown_media_type() {
        let mut req = request();
        req.media_types = vec!["hologram".to_string()];
        assert!(matches!(req.validate(), Err(ValidationError::UnknownMediaType(_))));
    }

    #[test]
    fn test_empty_media() {
        let mut req = request();
        req.media_types.clear();
        assert_eq!(req.validate().unwrap_err(), ValidationError::NoMediaSelected);
    }

    #[test]
    fn test_head_count_must_be_positive() {
        let mut req = request();
        req.number_of_people = 0;
        assert_eq!(req.validate().unwrap_err(), ValidationError::InvalidHeadCount(0));
    }

    #[test]
    fn test_add_ons_normalised_and_deduplicated() {
        let mut req = request();
        req.add_ons = vec![" Extra_Hour ".to_string(), "".to_string()];
        assert_eq!(req.validate().unwrap().add_ons, vec!["extra_hour".to_string()]);

        req.add_ons = vec!["extra_hour".to_string(), "EXTRA_HOUR".to_string()];
        assert_eq!(
            req.validate().unwrap_err(),
            ValidationError::DuplicateAddOn("extra_hour".to_string())
        );
    }

    #[test]
    fn test_deserialize_defaults() {
        let req: QuoteRequest = serde_json::from_str(
            r#"{"service_type":"event","tier":"silver","media_types":["video"],"parish":"St. James"}"#,
        )
        .unwrap();
        assert_eq!(req.number_of_people, 1);
        assert!(req.add_ons.is_empty());
        let selection = req.validate().unwrap();
        assert!(selection.include_video);
        assert_eq!(selection.parish, Parish::StJames);
    }
}
