//! Configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string
//!
//! ## Optional
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 8080)
//! - `DATABASE_MAX_CONNECTIONS` - Pool size (default: 10)
//! - `PUBLIC_BASE_URL` - Public site URL used in email links
//! - `STUDIO_NAME` - Studio name shown in emails
//! - `STUDIO_INBOX` - Where contact form messages go
//! - `EMAIL_API_URL` - Transactional email endpoint
//! - `EMAIL_API_KEY` - Email API key. Without it email is logged, not sent.
//! - `EMAIL_FROM_BOOKINGS`, `EMAIL_FROM_BILLING`, `EMAIL_FROM_ACCOUNTS`,
//!   `EMAIL_FROM_STUDIO` - Sender addresses per concern

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

use crate::booking::requests::validate_email;
use crate::notifications::{
    DeliveryError, EmailSenders, HttpMailer, LogMailer, Mailer, RenderContext, SenderIdentity,
};

const DEFAULT_EMAIL_API_URL: &str = "https://api.resend.com/emails";
const DEFAULT_STUDIO_NAME: &str = "Studio";
const DEFAULT_SENDER_DOMAIN: &str = "studio.example.com";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Mailer setup failed: {0}")]
    Mailer(#[from] DeliveryError),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub database_max_connections: u32,
    /// Public base URL, no trailing slash
    pub base_url: String,
    pub studio_name: String,
    /// Contact form destination
    pub studio_inbox: String,
    pub email: EmailConfig,
}

/// Outgoing email configuration.
#[derive(Clone)]
pub struct EmailConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub senders: EmailSenders,
}

// Manual Debug so the API key never reaches the logs
impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("senders", &self.senders)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `DATABASE_URL` is missing or a value fails
    /// to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url =
            get("DATABASE_URL").ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".into()))?;
        let host = parse_or("HOST", get("HOST"), IpAddr::from([0, 0, 0, 0]))?;
        let port = parse_or("PORT", get("PORT"), 8080u16)?;
        let database_max_connections = parse_or(
            "DATABASE_MAX_CONNECTIONS",
            get("DATABASE_MAX_CONNECTIONS"),
            10u32,
        )?;
        if database_max_connections == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "DATABASE_MAX_CONNECTIONS".into(),
                "must be at least 1".into(),
            ));
        }

        let base_url = get("PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();
        let studio_name = get("STUDIO_NAME").unwrap_or_else(|| DEFAULT_STUDIO_NAME.to_string());

        let sender = |key: &str, local: &str, label: &str| -> Result<SenderIdentity, ConfigError> {
            let address = get(key).unwrap_or_else(|| format!("{local}@{DEFAULT_SENDER_DOMAIN}"));
            validate_email(&address)
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
            Ok(SenderIdentity::new(&format!("{studio_name} {label}"), &address))
        };
        let senders = EmailSenders {
            bookings: sender("EMAIL_FROM_BOOKINGS", "bookings", "Bookings")?,
            billing: sender("EMAIL_FROM_BILLING", "billing", "Billing")?,
            accounts: sender("EMAIL_FROM_ACCOUNTS", "accounts", "Accounts")?,
            studio: sender("EMAIL_FROM_STUDIO", "hello", "Studio")?,
        };

        let studio_inbox = get("STUDIO_INBOX").unwrap_or_else(|| senders.studio.address.clone());
        validate_email(&studio_inbox)
            .map_err(|e| ConfigError::InvalidEnvVar("STUDIO_INBOX".into(), e.to_string()))?;

        Ok(Self {
            database_url,
            host,
            port,
            database_max_connections,
            base_url,
            studio_name,
            studio_inbox,
            email: EmailConfig {
                api_url: get("EMAIL_API_URL").unwrap_or_else(|| DEFAULT_EMAIL_API_URL.to_string()),
                api_key: get("EMAIL_API_KEY"),
                senders,
            },
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The HTTP mailer when an API key is set, otherwise the log-only one
    pub fn mailer(&self) -> Result<Mailer, ConfigError> {
        match &self.email.api_key {
            Some(key) => Ok(Mailer::Http(HttpMailer::new(&self.email.api_url, key)?)),
            None => {
                tracing::warn!("EMAIL_API_KEY not set, emails will be logged instead of sent");
                Ok(Mailer::Log(LogMailer))
            }
        }
    }

    pub fn render_context(&self) -> RenderContext {
        RenderContext {
            studio_name: self.studio_name.clone(),
            base_url: self.base_url.clone(),
            senders: self.email.senders.clone(),
        }
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(v) => v
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/studio")]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.base_url, "http://localhost:8080");
        assert!(config.email.api_key.is_none());
        assert_eq!(config.studio_inbox, "hello@studio.example.com");
        assert!(matches!(config.mailer().unwrap(), Mailer::Log(_)));
    }

    #[test]
    fn test_database_url_required() {
        assert!(matches!(load(&[]), Err(ConfigError::MissingEnvVar(k)) if k == "DATABASE_URL"));
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("DATABASE_URL", "postgres://x"), ("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(k, _) if k == "PORT"));
    }

    #[test]
    fn test_invalid_sender_address() {
        let err = load(&[
            ("DATABASE_URL", "postgres://x"),
            ("EMAIL_FROM_BILLING", "billing"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(k, _) if k == "EMAIL_FROM_BILLING"));
    }

    #[test]
    fn test_senders_and_base_url() {
        let config = load(&[
            ("DATABASE_URL", "postgres://x"),
            ("STUDIO_NAME", "Lens & Light"),
            ("PUBLIC_BASE_URL", "https://lensandlight.example.com/"),
            ("EMAIL_FROM_BOOKINGS", "book@lensandlight.example.com"),
            ("EMAIL_API_KEY", "re_test_123"),
        ])
        .unwrap();
        assert_eq!(config.base_url, "https://lensandlight.example.com");
        assert_eq!(
            config.email.senders.bookings.mailbox(),
            "Lens & Light Bookings <book@lensandlight.example.com>"
        );
        assert!(matches!(config.mailer().unwrap(), Mailer::Http(_)));
        assert!(!format!("{:?}", config).contains("re_test_123"));
    }
}
