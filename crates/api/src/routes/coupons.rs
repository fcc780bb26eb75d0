//! Public coupon endpoints: validation preview and checkout redemption.

use axum::{extract::State, Json};
use chrono::Utc;

use domain::models::{Coupon, CouponError, Discount, ProductPricing, ValidateCouponRequest};
use domain::services::validate_and_price;
use persistence::repositories::{CouponRedemptionRepository, CouponRepository, ProductRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_coupon_redeemed;

/// Runs the full coupon validation pipeline for a product purchase.
///
/// An unknown, malformed or missing code all surface as `NOT_FOUND` so a
/// caller cannot distinguish codes that never existed from ones they cannot
/// use.
async fn validated_discount(
    state: &AppState,
    request: &ValidateCouponRequest,
) -> Result<Discount, ApiError> {
    let code = shared::validation::normalize_coupon_code(&request.code);
    if shared::validation::validate_coupon_code(&code).is_err() {
        return Err(CouponError::NotFound.into());
    }

    let coupon: Coupon = CouponRepository::new(state.pool.clone())
        .find_by_code(&code)
        .await?
        .ok_or(CouponError::NotFound)?
        .into();

    let product: ProductPricing = ProductRepository::new(state.pool.clone())
        .find_pricing(request.product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?
        .into();

    let usage = CouponRedemptionRepository::new(state.pool.clone())
        .usage(coupon.id, request.customer_id.as_deref())
        .await?;

    Ok(validate_and_price(&coupon, &product, &usage, Utc::now())?)
}

/// Preview a coupon against a product without consuming a use.
pub async fn validate_coupon(
    State(state): State<AppState>,
    Json(request): Json<ValidateCouponRequest>,
) -> Result<Json<Discount>, ApiError> {
    let discount = validated_discount(&state, &request).await?;
    Ok(Json(discount))
}

/// Re-validate a coupon at checkout and consume a use.
///
/// The redemption record is the point of this endpoint, so unlike the
/// lifecycle side effects its failure fails the request.
pub async fn redeem_coupon(
    State(state): State<AppState>,
    Json(request): Json<ValidateCouponRequest>,
) -> Result<Json<Discount>, ApiError> {
    let discount = validated_discount(&state, &request).await?;

    CouponRedemptionRepository::new(state.pool.clone())
        .record(
            discount.coupon_id,
            request.customer_id.as_deref(),
            Some(request.product_id),
            None,
        )
        .await?;

    record_coupon_redeemed();
    tracing::info!(code = %discount.code, product_id = %request.product_id, "Coupon redeemed");

    Ok(Json(discount))
}
