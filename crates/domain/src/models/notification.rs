//! Notification payloads emitted by lifecycle transitions.
//!
//! The core only produces locale-neutral structured payloads; rendering and
//! delivery belong to the notification collaborator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Notification type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    QuoteOffer,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::QuoteOffer => write!(f, "quote_offer"),
        }
    }
}

/// Payload for "your quote has been priced" notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteOfferPayload {
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub quote_id: Uuid,
    pub quote_number: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    /// Deep link to the customer-facing quote page.
    pub link: String,
}
