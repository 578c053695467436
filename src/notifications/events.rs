//! Lifecycle events and the emails they render to.

use askama::Template;
use rust_decimal::Decimal;

use crate::booking::{Booking, PaymentKind};

/// Who an email appears to come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderIdentity {
    pub name: String,
    pub address: String,
}

impl SenderIdentity {
    pub fn new(name: &str, address: &str) -> Self {
        Self {
            name: name.to_string(),
            address: address.to_string(),
        }
    }

    /// `Name <address>` form for the From header
    pub fn mailbox(&self) -> String {
        format!("{} <{}>", self.name, self.address)
    }
}

/// Sender per concern
#[derive(Debug, Clone)]
pub struct EmailSenders {
    pub bookings: SenderIdentity,
    pub billing: SenderIdentity,
    pub accounts: SenderIdentity,
    pub studio: SenderIdentity,
}

/// Values shared by every email template
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub studio_name: String,
    pub base_url: String,
    pub senders: EmailSenders,
}

/// A rendered email ready for delivery
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub from: SenderIdentity,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
}

/// Booking fields shown in emails, pre-formatted
#[derive(Debug, Clone)]
pub struct BookingSummary {
    pub reference: String,
    pub client_name: String,
    pub package: String,
    pub coverage: String,
    pub shoot_date: String,
    pub shoot_time: Option<String>,
    pub location: String,
    pub add_ons: Vec<String>,
    pub total: String,
    pub deposit: String,
    pub balance: String,
    pub outstanding: String,
    pub currency: String,
}

impl From<&Booking> for BookingSummary {
    fn from(booking: &Booking) -> Self {
        let coverage = match (booking.include_photo, booking.include_video) {
            (true, true) => "Photography & videography",
            (false, true) => "Videography",
            _ => "Photography",
        };
        let money = |amount: Decimal| format_money(amount, &booking.currency);

        Self {
            reference: booking.reference(),
            client_name: booking.client_name.clone(),
            package: format!("{} {}", booking.service_type.label(), booking.tier.label()),
            coverage: coverage.to_string(),
            shoot_date: booking.shoot_date.format("%A, %B %-d, %Y").to_string(),
            shoot_time: booking.shoot_time.clone(),
            location: format!("{}, {}", booking.location, booking.parish),
            add_ons: booking.add_ons.iter().map(|a| a.replace('_', " ")).collect(),
            total: money(booking.total_price),
            deposit: money(booking.deposit_amount),
            balance: money(booking.balance_due),
            outstanding: money(booking.outstanding()),
            currency: booking.currency.clone(),
        }
    }
}

/// `USD 335.00`
pub fn format_money(amount: Decimal, currency: &str) -> String {
    format!("{} {:.2}", currency, amount)
}

/// Something that happened which a person should hear about by email
#[derive(Debug, Clone)]
pub enum NotificationEvent {
    BookingConfirmed(BookingSummary),
    PaymentReceived {
        booking: BookingSummary,
        kind: PaymentKind,
        amount: Decimal,
    },
    PasswordResetRequested {
        name: String,
        reset_url: String,
    },
    PhotographerApproved {
        name: String,
    },
    PhotographerRejected {
        name: String,
        reason: Option<String>,
    },
    AdminMessage {
        recipient_name: Option<String>,
        subject: String,
        body_html: String,
    },
    ContactReceived {
        name: String,
        email: String,
        phone: Option<String>,
        message: String,
    },
}

#[derive(Template)]
#[template(path = "email/booking_confirmed.html")]
struct BookingConfirmedEmail<'a> {
    studio_name: &'a str,
    base_url: &'a str,
    booking: &'a BookingSummary,
}

#[derive(Template)]
#[template(path = "email/payment_received.html")]
struct PaymentReceivedEmail<'a> {
    studio_name: &'a str,
    base_url: &'a str,
    booking: &'a BookingSummary,
    kind: &'a str,
    amount: &'a str,
    fully_paid: bool,
}

#[derive(Template)]
#[template(path = "email/password_reset.html")]
struct PasswordResetEmail<'a> {
    studio_name: &'a str,
    base_url: &'a str,
    name: &'a str,
    reset_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/photographer_approved.html")]
struct PhotographerApprovedEmail<'a> {
    studio_name: &'a str,
    base_url: &'a str,
    name: &'a str,
}

#[derive(Template)]
#[template(path = "email/photographer_rejected.html")]
struct PhotographerRejectedEmail<'a> {
    studio_name: &'a str,
    base_url: &'a str,
    name: &'a str,
    reason: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "email/admin_message.html")]
struct AdminMessageEmail<'a> {
    studio_name: &'a str,
    base_url: &'a str,
    recipient_name: Option<&'a str>,
    body_html: &'a str,
}

#[derive(Template)]
#[template(path = "email/contact_received.html")]
struct ContactReceivedEmail<'a> {
    studio_name: &'a str,
    base_url: &'a str,
    name: &'a str,
    email: &'a str,
    phone: Option<&'a str>,
    message: &'a str,
}

impl NotificationEvent {
    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationEvent::BookingConfirmed(_) => "booking_confirmed",
            NotificationEvent::PaymentReceived { .. } => "payment_received",
            NotificationEvent::PasswordResetRequested { .. } => "password_reset",
            NotificationEvent::PhotographerApproved { .. } => "photographer_approved",
            NotificationEvent::PhotographerRejected { .. } => "photographer_rejected",
            NotificationEvent::AdminMessage { .. } => "admin_message",
            NotificationEvent::ContactReceived { .. } => "contact_received",
        }
    }

    /// Render the subject, body and sender for this event.
    pub fn render(&self, to: &str, ctx: &RenderContext) -> Result<OutgoingEmail, askama::Error> {
        let studio_name = ctx.studio_name.as_str();
        let base_url = ctx.base_url.as_str();
        let senders = &ctx.senders;

        let (from, reply_to, subject, html) = match self {
            NotificationEvent::BookingConfirmed(booking) => (
                &senders.bookings,
                None,
                format!("Booking confirmation #{} - {}", booking.reference, studio_name),
                BookingConfirmedEmail {
                    studio_name,
                    base_url,
                    booking,
                }
                .render()?,
            ),
            NotificationEvent::PaymentReceived {
                booking,
                kind,
                amount,
            } => {
                let amount = format_money(*amount, &booking.currency);
                (
                    &senders.billing,
                    None,
                    format!("Payment received for booking #{}", booking.reference),
                    PaymentReceivedEmail {
                        studio_name,
                        base_url,
                        booking,
                        kind: match kind {
                            PaymentKind::Deposit => "deposit",
                            PaymentKind::Balance => "balance",
                        },
                        amount: &amount,
                        fully_paid: *kind == PaymentKind::Balance,
                    }
                    .render()?,
                )
            }
            NotificationEvent::PasswordResetRequested { name, reset_url } => (
                &senders.accounts,
                None,
                format!("Reset your {} password", studio_name),
                PasswordResetEmail {
                    studio_name,
                    base_url,
                    name,
                    reset_url,
                }
                .render()?,
            ),
            NotificationEvent::PhotographerApproved { name } => (
                &senders.accounts,
                None,
                "Your photographer account has been approved".to_string(),
                PhotographerApprovedEmail {
                    studio_name,
                    base_url,
                    name,
                }
                .render()?,
            ),
            NotificationEvent::PhotographerRejected { name, reason } => (
                &senders.accounts,
                None,
                "An update on your photographer application".to_string(),
                PhotographerRejectedEmail {
                    studio_name,
                    base_url,
                    name,
                    reason: reason.as_deref(),
                }
                .render()?,
            ),
            NotificationEvent::AdminMessage {
                recipient_name,
                subject,
                body_html,
            } => (
                &senders.studio,
                None,
                subject.clone(),
                AdminMessageEmail {
                    studio_name,
                    base_url,
                    recipient_name: recipient_name.as_deref(),
                    body_html,
                }
                .render()?,
            ),
            NotificationEvent::ContactReceived {
                name,
                email,
                phone,
                message,
            } => (
                &senders.studio,
                Some(email.clone()),
                format!("New enquiry from {}", name),
                ContactReceivedEmail {
                    studio_name,
                    base_url,
                    name,
                    email,
                    phone: phone.as_deref(),
                    message,
                }
                .render()?,
            ),
        };

        Ok(OutgoingEmail {
            to: to.to_string(),
            from: from.clone(),
            reply_to,
            subject,
            html,
        })
    }
}

#[cfg(test)]
pub(crate) fn test_context() -> RenderContext {
    RenderContext {
        studio_name: "Lens & Light Studio".to_string(),
        base_url: "https://studio.example.com".to_string(),
        senders: EmailSenders {
            bookings: SenderIdentity::new("Studio Bookings", "bookings@studio.example.com"),
            billing: SenderIdentity::new("Studio Billing", "billing@studio.example.com"),
            accounts: SenderIdentity::new("Studio Accounts", "accounts@studio.example.com"),
            studio: SenderIdentity::new("Lens & Light Studio", "hello@studio.example.com"),
        },
    }
}
