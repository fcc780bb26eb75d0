//! Quote request domain models for the quote negotiation workflow.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Stored status of a quote request.
///
/// `counter_offer` is deliberately absent: a pending counter-offer is stored
/// as `pending` (it re-enters the admin queue) and surfaces only through
/// [`DisplayStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Pending,
    Quoted,
    Accepted,
    Rejected,
    UserDeclined,
}

impl QuoteStatus {
    /// Returns true if no further in-scope transitions are defined.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            QuoteStatus::Accepted | QuoteStatus::Rejected | QuoteStatus::UserDeclined
        )
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteStatus::Pending => write!(f, "pending"),
            QuoteStatus::Quoted => write!(f, "quoted"),
            QuoteStatus::Accepted => write!(f, "accepted"),
            QuoteStatus::Rejected => write!(f, "rejected"),
            QuoteStatus::UserDeclined => write!(f, "user_declined"),
        }
    }
}

/// UI-facing status, covering all stored statuses plus the derived
/// `counter_offer` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    Pending,
    Quoted,
    Accepted,
    Rejected,
    UserDeclined,
    CounterOffer,
}

impl std::fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayStatus::Pending => write!(f, "pending"),
            DisplayStatus::Quoted => write!(f, "quoted"),
            DisplayStatus::Accepted => write!(f, "accepted"),
            DisplayStatus::Rejected => write!(f, "rejected"),
            DisplayStatus::UserDeclined => write!(f, "user_declined"),
            DisplayStatus::CounterOffer => write!(f, "counter_offer"),
        }
    }
}

/// Derives the UI-facing status from stored fields.
///
/// A quote that is `pending` with a recorded `user_response` is a
/// counter-offer waiting in the admin queue; every consumer must agree on
/// this rule, so it lives here and nowhere else.
pub fn derive_display_status(status: QuoteStatus, user_response: Option<&str>) -> DisplayStatus {
    match status {
        QuoteStatus::Pending if user_response.is_some() => DisplayStatus::CounterOffer,
        QuoteStatus::Pending => DisplayStatus::Pending,
        QuoteStatus::Quoted => DisplayStatus::Quoted,
        QuoteStatus::Accepted => DisplayStatus::Accepted,
        QuoteStatus::Rejected => DisplayStatus::Rejected,
        QuoteStatus::UserDeclined => DisplayStatus::UserDeclined,
    }
}

/// One customer inquiry, optionally tied to a product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct QuoteRequest {
    pub id: Uuid,
    pub quote_number: String,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub status: QuoteStatus,
    pub display_status: DisplayStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    /// Legacy free-form response field, retained for backward compatibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Metadata of an uploaded model file; the blob itself lives in file storage.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UploadedFile {
    pub file_name: String,
    pub size_bytes: u64,
}

/// Request to submit a new quote.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SubmitQuoteRequest {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub product_id: Option<Uuid>,
    #[serde(default)]
    pub file: Option<UploadedFile>,
}

/// Response after submitting a quote.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SubmitQuoteResponse {
    pub quote_id: Uuid,
    pub quote_number: String,
}

/// Customer-side response action on a quoted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseAction {
    Accept,
    Decline,
    CounterOffer,
}

/// Request to respond to a quote offer.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RespondToQuoteRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub action: ResponseAction,
    #[serde(default)]
    pub message: Option<String>,
}

/// Admin offer on a pending quote.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AdminSetOfferRequest {
    pub quoted_price: Decimal,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub coupon_code: Option<String>,
}

/// Admin manual override of quote fields; generates no message-log entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AdminUpdateQuoteRequest {
    #[serde(default)]
    pub status: Option<QuoteStatus>,
    #[serde(default)]
    pub quoted_price: Option<Decimal>,
    #[serde(default)]
    pub admin_notes: Option<String>,
}

/// Query parameters for the admin quote list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListQuotesQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    20
}

/// Pagination info for list responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

/// Response for listing quotes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListQuotesResponse {
    pub data: Vec<QuoteRequest>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_status_display() {
        assert_eq!(QuoteStatus::Pending.to_string(), "pending");
        assert_eq!(QuoteStatus::Quoted.to_string(), "quoted");
        assert_eq!(QuoteStatus::Accepted.to_string(), "accepted");
        assert_eq!(QuoteStatus::Rejected.to_string(), "rejected");
        assert_eq!(QuoteStatus::UserDeclined.to_string(), "user_declined");
    }

    #[test]
    fn test_terminal_states() {
        assert!(!QuoteStatus::Pending.is_terminal());
        assert!(!QuoteStatus::Quoted.is_terminal());
        assert!(QuoteStatus::Accepted.is_terminal());
        assert!(QuoteStatus::Rejected.is_terminal());
        assert!(QuoteStatus::UserDeclined.is_terminal());
    }

    #[test]
    fn test_derive_display_status_counter_offer() {
        let display = derive_display_status(QuoteStatus::Pending, Some("Can you do 40?"));
        assert_eq!(display, DisplayStatus::CounterOffer);
    }

    #[test]
    fn test_derive_display_status_initial_pending() {
        let display = derive_display_status(QuoteStatus::Pending, None);
        assert_eq!(display, DisplayStatus::Pending);
    }

    #[test]
    fn test_derive_display_status_passthrough() {
        // user_response survives into later states without changing the label
        assert_eq!(
            derive_display_status(QuoteStatus::Quoted, Some("earlier counter")),
            DisplayStatus::Quoted
        );
        assert_eq!(
            derive_display_status(QuoteStatus::Accepted, None),
            DisplayStatus::Accepted
        );
        assert_eq!(
            derive_display_status(QuoteStatus::UserDeclined, Some("too expensive")),
            DisplayStatus::UserDeclined
        );
    }

    #[test]
    fn test_submit_quote_request_validation() {
        let valid = SubmitQuoteRequest {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone: None,
            message: None,
            product_id: None,
            file: None,
        };
        assert!(valid.validate().is_ok());

        let bad_email = SubmitQuoteRequest {
            email: "not-an-email".to_string(),
            ..valid.clone()
        };
        assert!(bad_email.validate().is_err());

        let empty_name = SubmitQuoteRequest {
            name: String::new(),
            ..valid
        };
        assert!(empty_name.validate().is_err());
    }

    #[test]
    fn test_response_action_deserialize() {
        let req: RespondToQuoteRequest = serde_json::from_str(
            r#"{"email":"ana@example.com","action":"counter_offer","message":"Can you do 40?"}"#,
        )
        .unwrap();
        assert_eq!(req.action, ResponseAction::CounterOffer);
        assert_eq!(req.message.as_deref(), Some("Can you do 40?"));
    }

    #[test]
    fn test_list_query_defaults() {
        let query: ListQuotesQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.per_page, 20);
        assert!(query.status.is_none());
    }
}
