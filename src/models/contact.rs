//! Contact form submissions

use serde::Deserialize;

use crate::booking::requests::validate_email;
use crate::error::ValidationError;

/// Contact form fields as posted
#[derive(Debug, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

/// A contact submission that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<ContactMessage, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        validate_email(email)?;
        let message = self.message.trim();
        if message.is_empty() {
            return Err(ValidationError::MissingField("message"));
        }
        let phone = Some(self.phone.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        Ok(ContactMessage {
            name: name.to_string(),
            email: email.to_string(),
            phone,
            message: message.to_string(),
        })
    }
}
