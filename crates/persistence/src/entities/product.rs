//! Product pricing entity (database row mapping).

use domain::models::ProductPricing;
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Pricing fields of a catalog product; the rest of the product record is
/// owned by the storefront and not read here.
#[derive(Debug, Clone, FromRow)]
pub struct ProductPricingEntity {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub on_sale: bool,
    pub currency: String,
}

impl From<ProductPricingEntity> for ProductPricing {
    fn from(entity: ProductPricingEntity) -> Self {
        ProductPricing {
            id: entity.id,
            name: entity.name,
            price: entity.price,
            sale_price: entity.sale_price,
            on_sale: entity.on_sale,
            currency: entity.currency,
        }
    }
}
