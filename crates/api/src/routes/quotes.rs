//! Public quote endpoints: submission, retrieval and customer responses.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain::models::quote::{
    QuoteRequest, RespondToQuoteRequest, ResponseAction, SubmitQuoteRequest, SubmitQuoteResponse,
};
use domain::models::{QuoteStatus, SenderType};
use domain::services::{
    discount_label, localize_message, plan_customer_response, AttachedCoupon, CustomerAction,
    LifecycleError, Locale,
};
use persistence::entities::SenderTypeDb;
use persistence::repositories::{
    CouponRedemptionRepository, CouponRepository, QuoteMessageRepository, QuoteRepository,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::{record_quote_response, record_quote_submitted};
use crate::services::log_non_critical;

/// Query parameters for the public quote view.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GetQuoteQuery {
    pub email: String,
    #[serde(default)]
    pub locale: Option<String>,
}

/// A conversation-log entry with both its stored form and its rendering.
///
/// `message` is the raw stored string (envelope or plain text) so clients
/// can re-render in another locale; `rendered` is the server-side rendering
/// in the requested locale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct QuoteMessageView {
    pub id: Uuid,
    pub sender_type: SenderType,
    pub message: String,
    pub rendered: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

/// A quote with its rendered conversation log.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct QuoteDetailResponse {
    pub quote: QuoteRequest,
    pub messages: Vec<QuoteMessageView>,
}

/// Renders a quote's stored messages in the requested locale.
pub(crate) async fn load_messages(
    state: &AppState,
    quote_id: Uuid,
    locale: Locale,
) -> Result<Vec<QuoteMessageView>, ApiError> {
    let entities = QuoteMessageRepository::new(state.pool.clone())
        .list_for_quote(quote_id)
        .await?;
    Ok(entities
        .into_iter()
        .map(|entity| QuoteMessageView {
            id: entity.id,
            sender_type: entity.sender_type.into(),
            rendered: localize_message(&entity.message, locale),
            message: entity.message,
            quoted_price: entity.quoted_price,
            created_at: entity.created_at,
        })
        .collect())
}

/// Submit a new quote request.
pub async fn submit_quote(
    State(state): State<AppState>,
    Json(request): Json<SubmitQuoteRequest>,
) -> Result<(StatusCode, Json<SubmitQuoteResponse>), ApiError> {
    request.validate()?;

    if let Some(file) = &request.file {
        shared::validation::validate_model_file_name(&file.file_name)
            .map_err(validation_error)?;
        shared::validation::validate_model_file_size(file.size_bytes)
            .map_err(validation_error)?;
        if file.size_bytes > state.config.limits.max_model_file_bytes {
            return Err(ApiError::Validation("Model file is too large".to_string()));
        }
    }

    let quote_number = shared::reference::generate_quote_number(Utc::now());
    let entity = QuoteRepository::new(state.pool.clone())
        .create(
            &quote_number,
            &request.name,
            &request.email,
            request.phone.as_deref(),
            request.message.as_deref(),
            request.product_id,
            request.file.as_ref().map(|f| f.file_name.as_str()),
        )
        .await?;

    record_quote_submitted();
    tracing::info!(quote_id = %entity.id, quote_number = %entity.quote_number, "Quote submitted");

    Ok((
        StatusCode::CREATED,
        Json(SubmitQuoteResponse {
            quote_id: entity.id,
            quote_number: entity.quote_number,
        }),
    ))
}

/// Fetch a quote with its conversation log, scoped by customer email.
///
/// The first successful fetch stamps `viewed_at`; the stamp is a secondary
/// write and never fails the read.
pub async fn get_quote(
    State(state): State<AppState>,
    Path(quote_id): Path<Uuid>,
    Query(query): Query<GetQuoteQuery>,
) -> Result<Json<QuoteDetailResponse>, ApiError> {
    let repository = QuoteRepository::new(state.pool.clone());
    let entity = repository
        .find_for_customer(quote_id, &query.email)
        .await?
        .ok_or_else(quote_not_found)?;

    if should_stamp_viewed(entity.quoted_at, entity.viewed_at) {
        log_non_critical("mark_quote_viewed", repository.mark_viewed(quote_id).await);
    }

    let locale = Locale::from_tag(query.locale.as_deref().unwrap_or(""));
    let messages = load_messages(&state, quote_id, locale).await?;

    Ok(Json(QuoteDetailResponse {
        quote: entity.into(),
        messages,
    }))
}

/// Respond to a quoted offer: accept, decline or counter.
pub async fn respond_to_quote(
    State(state): State<AppState>,
    Path(quote_id): Path<Uuid>,
    Json(request): Json<RespondToQuoteRequest>,
) -> Result<Json<QuoteRequest>, ApiError> {
    request.validate()?;

    let repository = QuoteRepository::new(state.pool.clone());
    let entity = repository
        .find_for_customer(quote_id, &request.email)
        .await?
        .ok_or_else(quote_not_found)?;

    // The attached coupon only decorates the accept message; a failed lookup
    // must not block the response itself.
    let coupon = match entity.coupon_id {
        Some(coupon_id) => log_non_critical(
            "load_attached_coupon",
            CouponRepository::new(state.pool.clone())
                .find_by_id(coupon_id)
                .await,
        )
        .flatten()
        .map(|entity| {
            let coupon: domain::models::Coupon = entity.into();
            AttachedCoupon {
                code: coupon.code.clone(),
                discount_label: discount_label(&coupon),
            }
        }),
        None => None,
    };

    let action = match request.action {
        ResponseAction::Accept => CustomerAction::Accept,
        ResponseAction::Decline => CustomerAction::Decline {
            reason: request.message.clone(),
        },
        ResponseAction::CounterOffer => CustomerAction::CounterOffer {
            message: request.message.clone().unwrap_or_default(),
        },
    };

    let transition = plan_customer_response(
        entity.status.into(),
        entity.quoted_price,
        coupon.as_ref(),
        action,
    )
    .map_err(|err| match err {
        LifecycleError::NotRespondable => quote_not_found(),
        LifecycleError::EmptyCounterMessage => ApiError::Validation(err.to_string()),
    })?;

    let updated = repository
        .apply_customer_response(
            quote_id,
            &request.email,
            transition.new_status.into(),
            transition.user_response.as_deref(),
        )
        .await?
        .ok_or_else(quote_not_found)?;

    record_quote_response(match request.action {
        ResponseAction::Accept => "accept",
        ResponseAction::Decline => "decline",
        ResponseAction::CounterOffer => "counter_offer",
    });

    // Secondary writes: conversation log, then the redemption record when an
    // accepted offer carried a coupon.
    if let Some(text) = log_non_critical("encode_response_payload", transition.payload.encode()) {
        log_non_critical(
            "append_response_message",
            QuoteMessageRepository::new(state.pool.clone())
                .append(quote_id, SenderTypeDb::User, &text, None)
                .await,
        );
    }

    if transition.new_status == QuoteStatus::Accepted {
        if let (Some(coupon_id), Some(_)) = (entity.coupon_id, coupon.as_ref()) {
            log_non_critical(
                "record_coupon_redemption",
                CouponRedemptionRepository::new(state.pool.clone())
                    .record(
                        coupon_id,
                        Some(&request.email),
                        entity.product_id,
                        Some(quote_id),
                    )
                    .await,
            );
        }
    }

    Ok(Json(updated.into()))
}

/// `viewed_at` means "customer first opened the offer", so fetches made
/// before an offer exists must not stamp it.
fn should_stamp_viewed(
    quoted_at: Option<DateTime<Utc>>,
    viewed_at: Option<DateTime<Utc>>,
) -> bool {
    quoted_at.is_some() && viewed_at.is_none()
}

fn quote_not_found() -> ApiError {
    ApiError::NotFound("Quote not found".to_string())
}

fn validation_error(err: validator::ValidationError) -> ApiError {
    ApiError::Validation(
        err.message
            .map(|m| m.to_string())
            .unwrap_or_else(|| "Invalid value".to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_quote_query_locale_optional() {
        let query: GetQuoteQuery =
            serde_json::from_str(r#"{"email":"ana@example.com"}"#).unwrap();
        assert!(query.locale.is_none());

        let query: GetQuoteQuery =
            serde_json::from_str(r#"{"email":"ana@example.com","locale":"bg"}"#).unwrap();
        assert_eq!(query.locale.as_deref(), Some("bg"));
    }

    #[test]
    fn test_viewed_stamp_waits_for_an_offer() {
        let now = Utc::now();
        // Still pending: fetching must not count as opening the offer.
        assert!(!should_stamp_viewed(None, None));
        // Offer out, not yet seen: first open stamps.
        assert!(should_stamp_viewed(Some(now), None));
        // Already stamped: later views keep the original timestamp.
        assert!(!should_stamp_viewed(Some(now), Some(now)));
    }

    #[test]
    fn test_validation_error_message() {
        let err = shared::validation::validate_model_file_size(0).unwrap_err();
        match validation_error(err) {
            ApiError::Validation(msg) => assert!(!msg.is_empty()),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
