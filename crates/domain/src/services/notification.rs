//! Notification service seam.
//!
//! Lifecycle transitions emit structured payloads through this trait;
//! rendering and delivery belong to the implementing collaborator.

use crate::models::notification::QuoteOfferPayload;

/// Result of a notification send attempt.
///
/// Sends are secondary side effects: failures are reported here and logged
/// by the caller, never propagated into the primary mutation.
#[derive(Debug, Clone)]
pub enum NotificationResult {
    Sent,
    Failed(String),
}

/// Service trait for emitting customer notifications.
#[async_trait::async_trait]
pub trait NotificationService: Send + Sync {
    /// Notify a customer that their quote has been priced.
    async fn send_quote_offer(
        &self,
        recipient_email: &str,
        payload: QuoteOfferPayload,
    ) -> NotificationResult;
}

/// Mock notification service for development and testing.
///
/// Logs notifications but doesn't actually record or deliver them.
#[derive(Debug, Clone, Default)]
pub struct MockNotificationService {
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
}

impl MockNotificationService {
    pub fn new() -> Self {
        Self {
            simulate_failure: false,
        }
    }

    /// Create a mock service that simulates failures.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
        }
    }
}

#[async_trait::async_trait]
impl NotificationService for MockNotificationService {
    async fn send_quote_offer(
        &self,
        recipient_email: &str,
        payload: QuoteOfferPayload,
    ) -> NotificationResult {
        if self.simulate_failure {
            tracing::warn!(
                recipient = %recipient_email,
                quote_id = %payload.quote_id,
                "Mock notification service simulating failure"
            );
            return NotificationResult::Failed("Simulated failure".to_string());
        }

        tracing::info!(
            recipient = %recipient_email,
            quote_id = %payload.quote_id,
            quote_number = %payload.quote_number,
            price = %payload.price,
            "Mock: Would send quote_offer notification"
        );

        NotificationResult::Sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notification::NotificationType;
    use uuid::Uuid;

    fn payload() -> QuoteOfferPayload {
        QuoteOfferPayload {
            notification_type: NotificationType::QuoteOffer,
            quote_id: Uuid::nil(),
            quote_number: "Q-20260823-0001".to_string(),
            price: "49.99".parse().unwrap(),
            coupon_code: None,
            link: "/quotes/00000000-0000-0000-0000-000000000000".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_notification_service_send() {
        let service = MockNotificationService::new();
        let result = service.send_quote_offer("ana@example.com", payload()).await;
        assert!(matches!(result, NotificationResult::Sent));
    }

    #[tokio::test]
    async fn test_mock_notification_service_failure() {
        let service = MockNotificationService::failing();
        let result = service.send_quote_offer("ana@example.com", payload()).await;
        assert!(matches!(result, NotificationResult::Failed(_)));
    }
}
