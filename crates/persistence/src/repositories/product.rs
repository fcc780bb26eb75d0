//! Product repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ProductPricingEntity;
use crate::metrics::QueryTimer;

/// Repository for catalog product pricing lookups.
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Creates a new ProductRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the pricing fields of a product.
    pub async fn find_pricing(
        &self,
        id: Uuid,
    ) -> Result<Option<ProductPricingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_product_pricing");
        let result = sqlx::query_as::<_, ProductPricingEntity>(
            r#"
            SELECT id, name, price, sale_price, on_sale, currency
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
