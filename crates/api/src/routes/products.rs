//! Product promotion badge endpoint.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use domain::models::{Coupon, ProductPricing};
use domain::services::{best_coupon_for_product, discount_label};
use persistence::repositories::{CouponRepository, ProductRepository};

use crate::app::AppState;
use crate::error::ApiError;

/// The promotional coupon badge shown on a product page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PromotionView {
    pub code: String,
    pub label: String,
}

/// Promotion lookup response; `promotion` is absent when nothing applies.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PromotionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PromotionView>,
}

/// Resolve the promotional coupon to badge a product with, if any.
pub async fn product_promotion(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<PromotionResponse>, ApiError> {
    let product: ProductPricing = ProductRepository::new(state.pool.clone())
        .find_pricing(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?
        .into();

    let coupons: Vec<Coupon> = CouponRepository::new(state.pool.clone())
        .list_promotional()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let promotion = best_coupon_for_product(&product, &coupons, Utc::now()).map(|coupon| {
        PromotionView {
            code: coupon.code.clone(),
            label: discount_label(coupon),
        }
    });

    Ok(Json(PromotionResponse { promotion }))
}
