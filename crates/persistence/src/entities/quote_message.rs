//! Quote message entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{QuoteMessage, SenderType};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for the conversation-log sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "sender_type", rename_all = "lowercase")]
pub enum SenderTypeDb {
    Admin,
    User,
}

impl From<SenderTypeDb> for SenderType {
    fn from(sender: SenderTypeDb) -> Self {
        match sender {
            SenderTypeDb::Admin => SenderType::Admin,
            SenderTypeDb::User => SenderType::User,
        }
    }
}

impl From<SenderType> for SenderTypeDb {
    fn from(sender: SenderType) -> Self {
        match sender {
            SenderType::Admin => SenderTypeDb::Admin,
            SenderType::User => SenderTypeDb::User,
        }
    }
}

/// Database row mapping for the quote_messages table.
#[derive(Debug, Clone, FromRow)]
pub struct QuoteMessageEntity {
    pub id: Uuid,
    pub quote_id: Uuid,
    pub sender_type: SenderTypeDb,
    pub message: String,
    pub quoted_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl From<QuoteMessageEntity> for QuoteMessage {
    fn from(entity: QuoteMessageEntity) -> Self {
        QuoteMessage {
            id: entity.id,
            quote_id: entity.quote_id,
            sender_type: entity.sender_type.into(),
            message: entity.message,
            quoted_price: entity.quoted_price,
            created_at: entity.created_at,
        }
    }
}
