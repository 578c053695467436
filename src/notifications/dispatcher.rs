//! Fire-and-forget notification dispatch.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::booking::requests::validate_email;

use super::delivery::{DeliveryError, EmailDelivery, Mailer};
use super::events::{NotificationEvent, OutgoingEmail, RenderContext};

/// Renders lifecycle events and hands them to a delivery backend.
pub struct NotificationDispatcher<D = Mailer> {
    delivery: Arc<D>,
    context: Arc<RenderContext>,
}

impl<D> Clone for NotificationDispatcher<D> {
    fn clone(&self) -> Self {
        Self {
            delivery: self.delivery.clone(),
            context: self.context.clone(),
        }
    }
}

impl<D: EmailDelivery> NotificationDispatcher<D> {
    pub fn new(delivery: D, context: RenderContext) -> Self {
        Self {
            delivery: Arc::new(delivery),
            context: Arc::new(context),
        }
    }

    pub fn delivery(&self) -> &D {
        &self.delivery
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Render an event addressed to `to`.
    pub fn render(&self, to: &str, event: &NotificationEvent) -> Result<OutgoingEmail, DeliveryError> {
        validate_email(to).map_err(|_| DeliveryError::InvalidAddress(to.to_string()))?;
        Ok(event.render(to, &self.context)?)
    }

    /// Render and deliver, returning the outcome to the caller.
    pub async fn send(&self, to: &str, event: NotificationEvent) -> Result<(), DeliveryError> {
        let email = self.render(to, &event)?;
        self.delivery.deliver(&email).await?;
        info!(kind = event.kind(), to = %to, "Notification delivered");
        Ok(())
    }

    /// Deliver in the background. Failures are logged and dropped so the
    /// triggering booking or payment is never affected.
    pub fn dispatch(&self, to: &str, event: NotificationEvent) -> JoinHandle<()> {
        let dispatcher = self.clone();
        let to = to.to_string();
        tokio::spawn(async move {
            let kind = event.kind();
            if let Err(e) = dispatcher.send(&to, event).await {
                error!(kind, to = %to, "Notification delivery failed: {}", e);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::models::fixtures;
    use crate::notifications::delivery::testing::RecordingMailer;
    use crate::notifications::events::{test_context, BookingSummary};

    fn confirmed() -> NotificationEvent {
        NotificationEvent::BookingConfirmed(BookingSummary::from(&fixtures::booking()))
    }

    #[tokio::test]
    async fn test_send_delivers_rendered_email() {
        let dispatcher = NotificationDispatcher::new(RecordingMailer::default(), test_context());
        dispatcher.send("tanya@example.com", confirmed()).await.unwrap();

        let sent = dispatcher.delivery.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "tanya@example.com");
        assert_eq!(sent[0].from.address, "bookings@studio.example.com");
    }

    #[tokio::test]
    async fn test_send_reports_failure() {
        let dispatcher = NotificationDispatcher::new(RecordingMailer::failing(), test_context());
        let err = dispatcher.send("tanya@example.com", confirmed()).await.unwrap_err();
        assert!(matches!(err, DeliveryError::Api { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_dispatch_swallows_failure() {
        let dispatcher = NotificationDispatcher::new(RecordingMailer::failing(), test_context());
        // The task completes normally rather than panicking or propagating
        dispatcher
            .dispatch("tanya@example.com", confirmed())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_dispatch_delivers_in_background() {
        let dispatcher = NotificationDispatcher::new(RecordingMailer::default(), test_context());
        dispatcher
            .dispatch(
                "new@photographer.example.com",
                NotificationEvent::PhotographerApproved {
                    name: "Andre".to_string(),
                },
            )
            .await
            .unwrap();

        let sent = dispatcher.delivery.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from.address, "accounts@studio.example.com");
    }

    #[tokio::test]
    async fn test_invalid_recipient_not_delivered() {
        let dispatcher = NotificationDispatcher::new(RecordingMailer::default(), test_context());
        let err = dispatcher.send("not-an-address", confirmed()).await.unwrap_err();
        assert!(matches!(err, DeliveryError::InvalidAddress(_)));
        assert!(dispatcher.delivery.sent().is_empty());
    }
}
