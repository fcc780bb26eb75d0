//! Coupon repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{CouponEntity, CouponTypeDb};
use crate::metrics::QueryTimer;

const COUPON_SELECT: &str = r#"
    SELECT c.id, c.code, c.coupon_type, c.value, c.currency, c.min_purchase,
           c.max_uses, c.per_user_limit,
           COALESCE(array_agg(cp.product_id) FILTER (WHERE cp.product_id IS NOT NULL),
                    '{}'::uuid[]) AS product_ids,
           c.allow_on_sale, c.show_on_product, c.active,
           c.starts_at, c.expires_at, c.created_at, c.updated_at
    FROM coupons c
    LEFT JOIN coupon_products cp ON cp.coupon_id = c.id
"#;

/// Scalar fields of a coupon create or update. The product scope travels
/// separately because it lives in its own table.
#[derive(Debug, Clone)]
pub struct CouponWrite {
    pub coupon_type: CouponTypeDb,
    pub value: Decimal,
    pub currency: Option<String>,
    pub min_purchase: Option<Decimal>,
    pub max_uses: Option<i32>,
    pub per_user_limit: Option<i32>,
    pub allow_on_sale: bool,
    pub show_on_product: bool,
    pub active: bool,
    pub starts_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Repository for coupon database operations.
#[derive(Clone)]
pub struct CouponRepository {
    pool: PgPool,
}

impl CouponRepository {
    /// Creates a new CouponRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a coupon with its product scope. `code` must already be
    /// normalized to uppercase.
    pub async fn create(
        &self,
        code: &str,
        write: &CouponWrite,
        product_ids: &[Uuid],
    ) -> Result<CouponEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_coupon");
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO coupons
                (code, coupon_type, value, currency, min_purchase, max_uses,
                 per_user_limit, allow_on_sale, show_on_product, active,
                 starts_at, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            "#,
        )
        .bind(code)
        .bind(write.coupon_type)
        .bind(write.value)
        .bind(write.currency.as_deref())
        .bind(write.min_purchase)
        .bind(write.max_uses)
        .bind(write.per_user_limit)
        .bind(write.allow_on_sale)
        .bind(write.show_on_product)
        .bind(write.active)
        .bind(write.starts_at)
        .bind(write.expires_at)
        .fetch_one(&self.pool)
        .await?;

        self.replace_product_scope(id, product_ids).await?;
        let result = self.fetch_required(id).await;
        timer.record();
        result
    }

    /// Find a coupon by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CouponEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_coupon_by_id");
        let result = sqlx::query_as::<_, CouponEntity>(&format!(
            "{COUPON_SELECT} WHERE c.id = $1 GROUP BY c.id"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a coupon by its normalized code.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<CouponEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_coupon_by_code");
        let result = sqlx::query_as::<_, CouponEntity>(&format!(
            "{COUPON_SELECT} WHERE c.code = $1 GROUP BY c.id"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all coupons, newest first.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<CouponEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_coupons");
        let result = sqlx::query_as::<_, CouponEntity>(&format!(
            "{COUPON_SELECT} GROUP BY c.id ORDER BY c.created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count all coupons.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_coupons");
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM coupons")
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    /// List active coupons flagged for product-page display. Time-window and
    /// scope filtering happens in the caller.
    pub async fn list_promotional(&self) -> Result<Vec<CouponEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_promotional_coupons");
        let result = sqlx::query_as::<_, CouponEntity>(&format!(
            "{COUPON_SELECT} WHERE c.active AND c.show_on_product GROUP BY c.id"
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a coupon's scalar fields; absent fields are left unchanged.
    /// Pass `product_ids` to replace the product scope.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        value: Option<Decimal>,
        currency: Option<&str>,
        min_purchase: Option<Decimal>,
        max_uses: Option<i32>,
        per_user_limit: Option<i32>,
        allow_on_sale: Option<bool>,
        show_on_product: Option<bool>,
        active: Option<bool>,
        starts_at: Option<DateTime<Utc>>,
        expires_at: Option<DateTime<Utc>>,
        product_ids: Option<&[Uuid]>,
    ) -> Result<Option<CouponEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_coupon");
        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE coupons
            SET value = COALESCE($2, value),
                currency = COALESCE($3, currency),
                min_purchase = COALESCE($4, min_purchase),
                max_uses = COALESCE($5, max_uses),
                per_user_limit = COALESCE($6, per_user_limit),
                allow_on_sale = COALESCE($7, allow_on_sale),
                show_on_product = COALESCE($8, show_on_product),
                active = COALESCE($9, active),
                starts_at = COALESCE($10, starts_at),
                expires_at = COALESCE($11, expires_at),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(value)
        .bind(currency)
        .bind(min_purchase)
        .bind(max_uses)
        .bind(per_user_limit)
        .bind(allow_on_sale)
        .bind(show_on_product)
        .bind(active)
        .bind(starts_at)
        .bind(expires_at)
        .fetch_optional(&self.pool)
        .await?;

        let result = match updated {
            Some(id) => {
                if let Some(ids) = product_ids {
                    self.replace_product_scope(id, ids).await?;
                }
                self.find_by_id(id).await
            }
            None => Ok(None),
        };
        timer.record();
        result
    }

    /// Delete a coupon. Returns the number of rows removed.
    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_coupon");
        let result = sqlx::query("DELETE FROM coupons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        result.map(|r| r.rows_affected())
    }

    async fn replace_product_scope(
        &self,
        coupon_id: Uuid,
        product_ids: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM coupon_products WHERE coupon_id = $1")
            .bind(coupon_id)
            .execute(&self.pool)
            .await?;
        if !product_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO coupon_products (coupon_id, product_id)
                SELECT $1, unnest($2::uuid[])
                "#,
            )
            .bind(coupon_id)
            .bind(product_ids)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn fetch_required(&self, id: Uuid) -> Result<CouponEntity, sqlx::Error> {
        self.find_by_id(id).await?.ok_or(sqlx::Error::RowNotFound)
    }
}
