//! Transactional email for booking and account lifecycle events.
//!
//! Events render to HTML through askama templates under `templates/email/`,
//! then go to an `EmailDelivery` backend. Dispatch is fire-and-forget.

pub mod delivery;
pub mod dispatcher;
pub mod events;

pub use delivery::{DeliveryError, EmailDelivery, HttpMailer, LogMailer, Mailer};
pub use dispatcher::NotificationDispatcher;
pub use events::{
    BookingSummary, EmailSenders, NotificationEvent, OutgoingEmail, RenderContext, SenderIdentity,
};
