//! Email delivery backends.
//!
//! `HttpMailer` posts to a transactional-email HTTP API
//! (`POST {api_url}` with a bearer key and a JSON body of
//! `from`, `to`, `subject`, `html`, `reply_to`). `LogMailer` only logs and is
//! used when no API key is configured.

use std::future::Future;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Serialize;
use thiserror::Error;

use super::events::OutgoingEmail;

/// Errors that can occur when delivering email.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider rejected the message.
    #[error("Email API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Invalid recipient address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Client could not be built from configuration.
    #[error("Mailer configuration error: {0}")]
    Configuration(String),
}

/// Hands rendered messages to whatever actually sends them
pub trait EmailDelivery: Send + Sync + 'static {
    fn deliver(
        &self,
        email: &OutgoingEmail,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}

#[derive(Serialize)]
struct SendEmailBody<'a> {
    from: String,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

/// Transactional-email API client
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: Arc<str>,
}

impl HttpMailer {
    /// Create a client that authenticates with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns error if the key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(api_url: &str, api_key: &str) -> Result<Self, DeliveryError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", api_key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value)
                .map_err(|e| DeliveryError::Configuration(format!("Invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            api_url: Arc::from(api_url),
        })
    }
}

impl EmailDelivery for HttpMailer {
    async fn deliver(&self, email: &OutgoingEmail) -> Result<(), DeliveryError> {
        let body = SendEmailBody {
            from: email.from.mailbox(),
            to: [email.to.as_str()],
            subject: &email.subject,
            html: &email.html,
            reply_to: email.reply_to.as_deref(),
        };

        let response = self.client.post(&*self.api_url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Api {
                status: status.as_u16(),
                message,
            });
        }

        tracing::info!(to = %email.to, subject = %email.subject, "Email sent successfully");
        Ok(())
    }
}

/// Logs instead of sending
#[derive(Clone, Default)]
pub struct LogMailer;

impl EmailDelivery for LogMailer {
    async fn deliver(&self, email: &OutgoingEmail) -> Result<(), DeliveryError> {
        tracing::info!(
            to = %email.to,
            from = %email.from.address,
            subject = %email.subject,
            "Email delivery disabled, message logged only"
        );
        Ok(())
    }
}

/// The mailer picked from configuration at startup
#[derive(Clone)]
pub enum Mailer {
    Http(HttpMailer),
    Log(LogMailer),
}

impl EmailDelivery for Mailer {
    async fn deliver(&self, email: &OutgoingEmail) -> Result<(), DeliveryError> {
        match self {
            Mailer::Http(mailer) => mailer.deliver(email).await,
            Mailer::Log(mailer) => mailer.deliver(email).await,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Records every message; optionally fails each delivery
    #[derive(Default)]
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<OutgoingEmail>>,
        pub fail: bool,
    }

    impl RecordingMailer {
        pub fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub fn sent(&self) -> Vec<OutgoingEmail> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl EmailDelivery for RecordingMailer {
        async fn deliver(&self, email: &OutgoingEmail) -> Result<(), DeliveryError> {
            if self.fail {
                return Err(DeliveryError::Api {
                    status: 503,
                    message: "provider unavailable".to_string(),
                });
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }
}
