//! Database-backed notification delivery.
//!
//! The storefront polls stored notifications; this service writes one row
//! per quote offer through the domain notification seam.

use async_trait::async_trait;
use domain::models::QuoteOfferPayload;
use domain::services::{NotificationResult, NotificationService};
use persistence::repositories::NotificationRepository;

/// Notification service that persists notifications for in-app delivery.
#[derive(Clone)]
pub struct StoredNotificationService {
    repository: NotificationRepository,
}

impl StoredNotificationService {
    pub fn new(repository: NotificationRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl NotificationService for StoredNotificationService {
    async fn send_quote_offer(
        &self,
        recipient_email: &str,
        payload: QuoteOfferPayload,
    ) -> NotificationResult {
        let link = payload.link.clone();
        let quote_id = payload.quote_id;
        let notification_type = payload.notification_type.to_string();

        let value = match serde_json::to_value(&payload) {
            Ok(value) => value,
            Err(err) => return NotificationResult::Failed(err.to_string()),
        };

        match self
            .repository
            .create(
                recipient_email,
                &notification_type,
                value,
                Some(&link),
                Some(quote_id),
            )
            .await
        {
            Ok(_) => NotificationResult::Sent,
            Err(err) => NotificationResult::Failed(err.to_string()),
        }
    }
}
