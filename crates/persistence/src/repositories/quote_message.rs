//! Quote message repository for database operations.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{QuoteMessageEntity, SenderTypeDb};
use crate::metrics::QueryTimer;

/// Repository for the append-only quote conversation log.
#[derive(Clone)]
pub struct QuoteMessageRepository {
    pool: PgPool,
}

impl QuoteMessageRepository {
    /// Creates a new QuoteMessageRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a message to a quote's conversation log.
    pub async fn append(
        &self,
        quote_id: Uuid,
        sender_type: SenderTypeDb,
        message: &str,
        quoted_price: Option<Decimal>,
    ) -> Result<QuoteMessageEntity, sqlx::Error> {
        let timer = QueryTimer::new("append_quote_message");
        let result = sqlx::query_as::<_, QuoteMessageEntity>(
            r#"
            INSERT INTO quote_messages (quote_id, sender_type, message, quoted_price)
            VALUES ($1, $2, $3, $4)
            RETURNING id, quote_id, sender_type, message, quoted_price, created_at
            "#,
        )
        .bind(quote_id)
        .bind(sender_type)
        .bind(message)
        .bind(quoted_price)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List a quote's messages in chronological order.
    pub async fn list_for_quote(
        &self,
        quote_id: Uuid,
    ) -> Result<Vec<QuoteMessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_quote_messages");
        let result = sqlx::query_as::<_, QuoteMessageEntity>(
            r#"
            SELECT id, quote_id, sender_type, message, quoted_price, created_at
            FROM quote_messages
            WHERE quote_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(quote_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
