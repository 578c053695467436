//! Site configuration models

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Studio-wide settings shown on every page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site_name: String,
    pub tagline: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub address: String,
    /// Theme keys to colour/font values, emitted as CSS custom properties
    pub theme: BTreeMap<String, String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let theme = [
            ("primary_color", "#1f2933"),
            ("accent_color", "#d4a373"),
            ("background_color", "#faf7f2"),
            ("heading_font", "'Playfair Display', serif"),
            ("body_font", "'Inter', sans-serif"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            site_name: "Studio".to_string(),
            tagline: "Photography and videography across Jamaica".to_string(),
            contact_email: String::new(),
            contact_phone: String::new(),
            address: String::new(),
            theme,
        }
    }
}

impl SiteConfig {
    /// Render the theme as a `:root` block of CSS custom properties.
    ///
    /// Keys become kebab-case (`primary_color` -> `--primary-color`). Entries
    /// whose key or value could break out of the declaration are skipped.
    pub fn css_variables(&self) -> String {
        let mut css = String::from(":root {");
        for (key, value) in &self.theme {
            let Some(name) = css_property_name(key) else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() || value.contains([';', '{', '}', '<', '>']) {
                continue;
            }
            css.push_str(&format!(" --{}: {};", name, value));
        }
        css.push_str(" }");
        css
    }

    /// `"Page | Site"` title, or just the site name for an empty page title
    pub fn page_title(&self, title: &str) -> String {
        if title.is_empty() {
            self.site_name.clone()
        } else {
            format!("{} | {}", title, self.site_name)
        }
    }
}

fn css_property_name(key: &str) -> Option<String> {
    let name: String = key
        .trim()
        .chars()
        .map(|c| match c {
            '_' | ' ' => '-',
            c => c.to_ascii_lowercase(),
        })
        .collect();
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    valid.then_some(name)
}

/// Saved row from site_configs (latest row wins)
#[derive(Debug, Clone, FromRow)]
pub struct SiteConfigRow {
    pub id: i32,
    pub config: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl SiteConfigRow {
    /// Missing keys take their defaults; a blob of the wrong shape is `None`
    pub fn parse(self) -> Option<SiteConfig> {
        serde_json::from_value(self.config).ok()
    }
}
