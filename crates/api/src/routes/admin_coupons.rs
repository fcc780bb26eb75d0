//! Admin coupon management endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain::models::coupon::{CreateCouponRequest, UpdateCouponRequest};
use domain::models::quote::Pagination;
use domain::models::Coupon;
use persistence::repositories::coupon::CouponWrite;
use persistence::repositories::CouponRepository;

use crate::app::AppState;
use crate::error::ApiError;

/// Query parameters for the coupon list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListCouponsQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    20
}

/// Response for listing coupons.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListCouponsResponse {
    pub data: Vec<Coupon>,
    pub pagination: Pagination,
}

/// List coupons, newest first.
pub async fn list_coupons(
    State(state): State<AppState>,
    Query(query): Query<ListCouponsQuery>,
) -> Result<Json<ListCouponsResponse>, ApiError> {
    let per_page = query.per_page.clamp(1, state.config.limits.max_page_size);
    let page = query.page.max(1);
    let offset = (page - 1) * per_page;

    let repository = CouponRepository::new(state.pool.clone());
    let data: Vec<Coupon> = repository
        .list(per_page, offset)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = repository.count().await?;

    Ok(Json(ListCouponsResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
        },
    }))
}

/// Create a coupon.
pub async fn create_coupon(
    State(state): State<AppState>,
    Json(request): Json<CreateCouponRequest>,
) -> Result<(StatusCode, Json<Coupon>), ApiError> {
    request.validate()?;
    let code = request.normalized_code().map_err(ApiError::Validation)?;
    request
        .validate_semantics()
        .map_err(ApiError::Validation)?;

    let write = CouponWrite {
        coupon_type: request.coupon_type.into(),
        value: request.value,
        currency: request.currency.clone(),
        min_purchase: request.min_purchase,
        max_uses: request.max_uses,
        per_user_limit: request.per_user_limit,
        allow_on_sale: request.allow_on_sale,
        show_on_product: request.show_on_product,
        active: request.active,
        starts_at: request.starts_at,
        expires_at: request.expires_at,
    };

    let entity = CouponRepository::new(state.pool.clone())
        .create(&code, &write, &request.product_ids)
        .await?;

    tracing::info!(code = %code, "Coupon created");

    Ok((StatusCode::CREATED, Json(entity.into())))
}

/// Fetch a coupon by ID.
pub async fn get_coupon(
    State(state): State<AppState>,
    Path(coupon_id): Path<Uuid>,
) -> Result<Json<Coupon>, ApiError> {
    let entity = CouponRepository::new(state.pool.clone())
        .find_by_id(coupon_id)
        .await?
        .ok_or_else(coupon_not_found)?;
    Ok(Json(entity.into()))
}

/// Update a coupon; absent fields are left unchanged.
pub async fn update_coupon(
    State(state): State<AppState>,
    Path(coupon_id): Path<Uuid>,
    Json(request): Json<UpdateCouponRequest>,
) -> Result<Json<Coupon>, ApiError> {
    let updated = CouponRepository::new(state.pool.clone())
        .update(
            coupon_id,
            request.value,
            request.currency.as_deref(),
            request.min_purchase,
            request.max_uses,
            request.per_user_limit,
            request.allow_on_sale,
            request.show_on_product,
            request.active,
            request.starts_at,
            request.expires_at,
            request.product_ids.as_deref(),
        )
        .await?
        .ok_or_else(coupon_not_found)?;

    Ok(Json(updated.into()))
}

/// Delete a coupon. Its redemption history goes with it.
pub async fn delete_coupon(
    State(state): State<AppState>,
    Path(coupon_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let removed = CouponRepository::new(state.pool.clone())
        .delete(coupon_id)
        .await?;
    if removed == 0 {
        return Err(coupon_not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}

fn coupon_not_found() -> ApiError {
    ApiError::NotFound("Coupon not found".to_string())
}
