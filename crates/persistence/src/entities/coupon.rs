//! Coupon entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Coupon, CouponType};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for the coupon value interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "coupon_type", rename_all = "lowercase")]
pub enum CouponTypeDb {
    Percentage,
    Fixed,
}

impl From<CouponTypeDb> for CouponType {
    fn from(coupon_type: CouponTypeDb) -> Self {
        match coupon_type {
            CouponTypeDb::Percentage => CouponType::Percentage,
            CouponTypeDb::Fixed => CouponType::Fixed,
        }
    }
}

impl From<CouponType> for CouponTypeDb {
    fn from(coupon_type: CouponType) -> Self {
        match coupon_type {
            CouponType::Percentage => CouponTypeDb::Percentage,
            CouponType::Fixed => CouponTypeDb::Fixed,
        }
    }
}

/// Database row mapping for the coupons table, with the product scope
/// aggregated from coupon_products.
#[derive(Debug, Clone, FromRow)]
pub struct CouponEntity {
    pub id: Uuid,
    pub code: String,
    pub coupon_type: CouponTypeDb,
    pub value: Decimal,
    pub currency: Option<String>,
    pub min_purchase: Option<Decimal>,
    pub max_uses: Option<i32>,
    pub per_user_limit: Option<i32>,
    pub product_ids: Vec<Uuid>,
    pub allow_on_sale: bool,
    pub show_on_product: bool,
    pub active: bool,
    pub starts_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CouponEntity> for Coupon {
    fn from(entity: CouponEntity) -> Self {
        Coupon {
            id: entity.id,
            code: entity.code,
            coupon_type: entity.coupon_type.into(),
            value: entity.value,
            currency: entity.currency,
            min_purchase: entity.min_purchase,
            max_uses: entity.max_uses,
            per_user_limit: entity.per_user_limit,
            product_ids: entity.product_ids,
            allow_on_sale: entity.allow_on_sale,
            show_on_product: entity.show_on_product,
            active: entity.active,
            starts_at: entity.starts_at,
            expires_at: entity.expires_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
