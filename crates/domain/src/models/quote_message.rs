//! Conversation-log models and the structured message envelope.
//!
//! Customer-authored transition messages are stored as a JSON envelope with a
//! `key` field selecting a localized template at render time. Admin messages
//! stay plain text (the admin writes in one language at composition time), as
//! do legacy messages written before the envelope existed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a conversation-log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderType {
    Admin,
    User,
}

impl std::fmt::Display for SenderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SenderType::Admin => write!(f, "admin"),
            SenderType::User => write!(f, "user"),
        }
    }
}

/// One immutable entry in a quote's append-only conversation log.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct QuoteMessage {
    pub id: Uuid,
    pub quote_id: Uuid,
    pub sender_type: SenderType,
    /// Plain text (admin/legacy) or a JSON [`MessagePayload`] envelope.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

/// Structured envelope for customer-authored transition messages.
///
/// Stored as `{"key": "accepted", ...}` so the log renders in any locale
/// without persisting pre-rendered copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "key", rename_all = "snake_case")]
pub enum MessagePayload {
    Accepted {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        price: Option<String>,
        #[serde(
            rename = "couponCode",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        coupon_code: Option<String>,
        #[serde(
            rename = "couponDiscount",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        coupon_discount: Option<String>,
    },
    Declined {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    CounterOffer { text: String },
}

impl MessagePayload {
    /// Serializes the envelope to its stored JSON form.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Attempts to parse a stored message as an envelope.
    ///
    /// Returns `None` for plain-text messages and for envelopes with an
    /// unrecognized `key`; callers fall back to plain-text rendering.
    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_type_display() {
        assert_eq!(SenderType::Admin.to_string(), "admin");
        assert_eq!(SenderType::User.to_string(), "user");
    }

    #[test]
    fn test_accepted_envelope_shape() {
        let payload = MessagePayload::Accepted {
            price: Some("49.99".to_string()),
            coupon_code: Some("SAVE10".to_string()),
            coupon_discount: Some("10%".to_string()),
        };
        let json = payload.encode().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["key"], "accepted");
        assert_eq!(value["price"], "49.99");
        assert_eq!(value["couponCode"], "SAVE10");
        assert_eq!(value["couponDiscount"], "10%");
    }

    #[test]
    fn test_counter_offer_envelope_key() {
        let payload = MessagePayload::CounterOffer {
            text: "Can you do 40?".to_string(),
        };
        let json = payload.encode().unwrap();
        assert!(json.contains(r#""key":"counter_offer""#));

        let decoded = MessagePayload::decode(&json).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn test_decode_accepted_without_optional_fields() {
        let decoded = MessagePayload::decode(r#"{"key":"accepted"}"#).unwrap();
        assert_eq!(
            decoded,
            MessagePayload::Accepted {
                price: None,
                coupon_code: None,
                coupon_discount: None,
            }
        );
    }

    #[test]
    fn test_decode_plain_text_falls_through() {
        assert!(MessagePayload::decode("Thanks, we will get back to you.").is_none());
        assert!(MessagePayload::decode("line one\nline two").is_none());
    }

    #[test]
    fn test_decode_unrecognized_key_falls_through() {
        assert!(MessagePayload::decode(r#"{"key":"refunded","amount":"5.00"}"#).is_none());
    }
}
