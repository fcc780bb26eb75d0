//! Quote request entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{derive_display_status, QuoteRequest, QuoteStatus};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for quote request status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "quote_status", rename_all = "snake_case")]
pub enum QuoteStatusDb {
    Pending,
    Quoted,
    Accepted,
    Rejected,
    UserDeclined,
}

impl From<QuoteStatusDb> for QuoteStatus {
    fn from(status: QuoteStatusDb) -> Self {
        match status {
            QuoteStatusDb::Pending => QuoteStatus::Pending,
            QuoteStatusDb::Quoted => QuoteStatus::Quoted,
            QuoteStatusDb::Accepted => QuoteStatus::Accepted,
            QuoteStatusDb::Rejected => QuoteStatus::Rejected,
            QuoteStatusDb::UserDeclined => QuoteStatus::UserDeclined,
        }
    }
}

impl From<QuoteStatus> for QuoteStatusDb {
    fn from(status: QuoteStatus) -> Self {
        match status {
            QuoteStatus::Pending => QuoteStatusDb::Pending,
            QuoteStatus::Quoted => QuoteStatusDb::Quoted,
            QuoteStatus::Accepted => QuoteStatusDb::Accepted,
            QuoteStatus::Rejected => QuoteStatusDb::Rejected,
            QuoteStatus::UserDeclined => QuoteStatusDb::UserDeclined,
        }
    }
}

/// Database row mapping for the quote_requests table.
#[derive(Debug, Clone, FromRow)]
pub struct QuoteRequestEntity {
    pub id: Uuid,
    pub quote_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub message: Option<String>,
    pub product_id: Option<Uuid>,
    pub file_name: Option<String>,
    pub status: QuoteStatusDb,
    pub quoted_price: Option<Decimal>,
    pub admin_notes: Option<String>,
    pub user_response: Option<String>,
    pub coupon_id: Option<Uuid>,
    pub viewed_at: Option<DateTime<Utc>>,
    pub quoted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<QuoteRequestEntity> for QuoteRequest {
    fn from(entity: QuoteRequestEntity) -> Self {
        let status = QuoteStatus::from(entity.status);
        let display_status = derive_display_status(status, entity.user_response.as_deref());
        QuoteRequest {
            id: entity.id,
            quote_number: entity.quote_number,
            customer_name: entity.customer_name,
            customer_email: entity.customer_email,
            customer_phone: entity.customer_phone,
            message: entity.message,
            product_id: entity.product_id,
            file_name: entity.file_name,
            status,
            display_status,
            quoted_price: entity.quoted_price,
            admin_notes: entity.admin_notes,
            user_response: entity.user_response,
            coupon_id: entity.coupon_id,
            viewed_at: entity.viewed_at,
            quoted_at: entity.quoted_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
