//! Coupon redemption repository for database operations.
//!
//! Usage limits are counted from the append-only redemption log rather than
//! from counters on the coupon row, so a deleted redemption or a reporting
//! query never drifts from the enforced numbers.

use domain::models::CouponUsage;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::metrics::QueryTimer;

#[derive(Debug, FromRow)]
struct UsageRow {
    total: i64,
    by_customer: i64,
}

/// Repository for the coupon redemption log.
#[derive(Clone)]
pub struct CouponRedemptionRepository {
    pool: PgPool,
}

impl CouponRedemptionRepository {
    /// Creates a new CouponRedemptionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Usage counts for a coupon. `by_customer` is zero when no customer
    /// identity is supplied.
    pub async fn usage(
        &self,
        coupon_id: Uuid,
        customer_id: Option<&str>,
    ) -> Result<CouponUsage, sqlx::Error> {
        let timer = QueryTimer::new("coupon_usage_counts");
        let result = sqlx::query_as::<_, UsageRow>(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE customer_id = $2) AS by_customer
            FROM coupon_redemptions
            WHERE coupon_id = $1
            "#,
        )
        .bind(coupon_id)
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await
        .map(|row| CouponUsage {
            total: row.total,
            by_customer: row.by_customer,
        });
        timer.record();
        result
    }

    /// Record a redemption.
    pub async fn record(
        &self,
        coupon_id: Uuid,
        customer_id: Option<&str>,
        product_id: Option<Uuid>,
        quote_id: Option<Uuid>,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("record_coupon_redemption");
        let result = sqlx::query(
            r#"
            INSERT INTO coupon_redemptions (coupon_id, customer_id, product_id, quote_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(coupon_id)
        .bind(customer_id)
        .bind(product_id)
        .bind(quote_id)
        .execute(&self.pool)
        .await;
        timer.record();
        result.map(|_| ())
    }
}
