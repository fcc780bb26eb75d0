//! Quote request repository for database operations.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{QuoteRequestEntity, QuoteStatusDb};
use crate::metrics::QueryTimer;

const QUOTE_COLUMNS: &str = "id, quote_number, customer_name, customer_email, customer_phone, \
     message, product_id, file_name, status, quoted_price, admin_notes, user_response, \
     coupon_id, viewed_at, quoted_at, created_at, updated_at";

/// Admin list filter, expressed in UI-facing status terms.
///
/// `counter_offer` is not a stored status; it selects pending rows that carry
/// a customer response. Plain `pending` excludes those rows so the two queue
/// views partition the pending set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteListFilter {
    All,
    Status(QuoteStatusDb),
    CounterOffer,
}

/// Repository for quote request database operations.
#[derive(Clone)]
pub struct QuoteRepository {
    pool: PgPool,
}

impl QuoteRepository {
    /// Creates a new QuoteRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create a new quote request in the `pending` state.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        quote_number: &str,
        customer_name: &str,
        customer_email: &str,
        customer_phone: Option<&str>,
        message: Option<&str>,
        product_id: Option<Uuid>,
        file_name: Option<&str>,
    ) -> Result<QuoteRequestEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_quote");
        let result = sqlx::query_as::<_, QuoteRequestEntity>(&format!(
            r#"
            INSERT INTO quote_requests
                (quote_number, customer_name, customer_email, customer_phone,
                 message, product_id, file_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {QUOTE_COLUMNS}
            "#,
        ))
        .bind(quote_number)
        .bind(customer_name)
        .bind(customer_email)
        .bind(customer_phone)
        .bind(message)
        .bind(product_id)
        .bind(file_name)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a quote request by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<QuoteRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_quote_by_id");
        let result = sqlx::query_as::<_, QuoteRequestEntity>(&format!(
            r#"
            SELECT {QUOTE_COLUMNS}
            FROM quote_requests
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a quote request by ID, scoped to the owning customer email.
    ///
    /// A wrong email behaves exactly like an unknown ID so the public lookup
    /// cannot be used to probe for quote existence.
    pub async fn find_for_customer(
        &self,
        id: Uuid,
        customer_email: &str,
    ) -> Result<Option<QuoteRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_quote_for_customer");
        let result = sqlx::query_as::<_, QuoteRequestEntity>(&format!(
            r#"
            SELECT {QUOTE_COLUMNS}
            FROM quote_requests
            WHERE id = $1 AND customer_email = $2
            "#,
        ))
        .bind(id)
        .bind(customer_email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Record the first time the customer opened the offer. Later views keep
    /// the original timestamp; fetches before an offer exists stamp nothing.
    pub async fn mark_viewed(&self, id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("mark_quote_viewed");
        let result = sqlx::query(
            r#"
            UPDATE quote_requests
            SET viewed_at = NOW()
            WHERE id = $1 AND viewed_at IS NULL AND quoted_at IS NOT NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await;
        timer.record();
        result.map(|_| ())
    }

    /// List quote requests, newest first.
    pub async fn list(
        &self,
        filter: QuoteListFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<QuoteRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_quotes");
        let result = match filter {
            QuoteListFilter::All => {
                sqlx::query_as::<_, QuoteRequestEntity>(&format!(
                    r#"
                    SELECT {QUOTE_COLUMNS}
                    FROM quote_requests
                    ORDER BY created_at DESC
                    LIMIT $1 OFFSET $2
                    "#,
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            QuoteListFilter::Status(QuoteStatusDb::Pending) => {
                sqlx::query_as::<_, QuoteRequestEntity>(&format!(
                    r#"
                    SELECT {QUOTE_COLUMNS}
                    FROM quote_requests
                    WHERE status = 'pending' AND user_response IS NULL
                    ORDER BY created_at DESC
                    LIMIT $1 OFFSET $2
                    "#,
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            QuoteListFilter::Status(status) => {
                sqlx::query_as::<_, QuoteRequestEntity>(&format!(
                    r#"
                    SELECT {QUOTE_COLUMNS}
                    FROM quote_requests
                    WHERE status = $1
                    ORDER BY created_at DESC
                    LIMIT $2 OFFSET $3
                    "#,
                ))
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            QuoteListFilter::CounterOffer => {
                sqlx::query_as::<_, QuoteRequestEntity>(&format!(
                    r#"
                    SELECT {QUOTE_COLUMNS}
                    FROM quote_requests
                    WHERE status = 'pending' AND user_response IS NOT NULL
                    ORDER BY created_at DESC
                    LIMIT $1 OFFSET $2
                    "#,
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
        };
        timer.record();
        result
    }

    /// Count quote requests matching a list filter.
    pub async fn count(&self, filter: QuoteListFilter) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_quotes");
        let result = match filter {
            QuoteListFilter::All => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM quote_requests")
                    .fetch_one(&self.pool)
                    .await
            }
            QuoteListFilter::Status(QuoteStatusDb::Pending) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM quote_requests WHERE status = 'pending' AND user_response IS NULL",
                )
                .fetch_one(&self.pool)
                .await
            }
            QuoteListFilter::Status(status) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM quote_requests WHERE status = $1",
                )
                .bind(status)
                .fetch_one(&self.pool)
                .await
            }
            QuoteListFilter::CounterOffer => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM quote_requests WHERE status = 'pending' AND user_response IS NOT NULL",
                )
                .fetch_one(&self.pool)
                .await
            }
        };
        timer.record();
        result
    }

    /// Record an admin offer: moves the quote to `quoted`, stamps `quoted_at`
    /// and clears any earlier counter-offer text so a re-quote returns the
    /// quote to the customer's court.
    pub async fn set_offer(
        &self,
        id: Uuid,
        quoted_price: Decimal,
        admin_notes: Option<&str>,
        coupon_id: Option<Uuid>,
    ) -> Result<Option<QuoteRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_quote_offer");
        let result = sqlx::query_as::<_, QuoteRequestEntity>(&format!(
            r#"
            UPDATE quote_requests
            SET status = 'quoted',
                quoted_price = $2,
                admin_notes = $3,
                coupon_id = $4,
                quoted_at = NOW(),
                user_response = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {QUOTE_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(quoted_price)
        .bind(admin_notes)
        .bind(coupon_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Manual admin edit of selected fields; absent fields are left unchanged.
    pub async fn update_fields(
        &self,
        id: Uuid,
        status: Option<QuoteStatusDb>,
        quoted_price: Option<Decimal>,
        admin_notes: Option<&str>,
    ) -> Result<Option<QuoteRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_quote_fields");
        let result = sqlx::query_as::<_, QuoteRequestEntity>(&format!(
            r#"
            UPDATE quote_requests
            SET status = COALESCE($2, status),
                quoted_price = COALESCE($3, quoted_price),
                admin_notes = COALESCE($4, admin_notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {QUOTE_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(status)
        .bind(quoted_price)
        .bind(admin_notes)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Apply a customer response as one conditional write.
    ///
    /// The row is updated only while it is still `quoted` and belongs to the
    /// given email, so two racing responses cannot both land; the loser sees
    /// `None` and is reported as not found. A `None` `user_response` leaves
    /// the stored value untouched.
    pub async fn apply_customer_response(
        &self,
        id: Uuid,
        customer_email: &str,
        new_status: QuoteStatusDb,
        user_response: Option<&str>,
    ) -> Result<Option<QuoteRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("apply_customer_response");
        let result = sqlx::query_as::<_, QuoteRequestEntity>(&format!(
            r#"
            UPDATE quote_requests
            SET status = $3,
                user_response = COALESCE($4, user_response),
                updated_at = NOW()
            WHERE id = $1 AND customer_email = $2 AND status = 'quoted'
            RETURNING {QUOTE_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(customer_email)
        .bind(new_status)
        .bind(user_response)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a quote request. Returns the number of rows removed.
    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_quote");
        let result = sqlx::query("DELETE FROM quote_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        result.map(|r| r.rows_affected())
    }
}
