//! Admin quote endpoints: queue listing, offers, manual edits, deletion.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use domain::models::notification::{NotificationType, QuoteOfferPayload};
use domain::models::quote::{
    AdminSetOfferRequest, AdminUpdateQuoteRequest, ListQuotesQuery, ListQuotesResponse,
    Pagination, QuoteRequest,
};
use domain::models::Coupon;
use domain::services::{
    compose_offer_message, discount_label, round2, validate_for_quote, AttachedCoupon, Locale,
    NotificationResult, NotificationService,
};
use persistence::entities::{QuoteStatusDb, SenderTypeDb};
use persistence::repositories::{
    CouponRedemptionRepository, CouponRepository, NotificationRepository, QuoteListFilter,
    QuoteMessageRepository, QuoteRepository,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::routes::quotes::{load_messages, QuoteDetailResponse};
use crate::services::{log_non_critical, StoredNotificationService};

/// Translate the `status` query parameter into a list filter.
///
/// `counter_offer` is accepted even though it is not a stored status; it
/// selects the derived counter-offer view of the pending queue.
fn parse_status_filter(status: Option<&str>) -> Result<QuoteListFilter, ApiError> {
    match status {
        None => Ok(QuoteListFilter::All),
        Some("pending") => Ok(QuoteListFilter::Status(QuoteStatusDb::Pending)),
        Some("quoted") => Ok(QuoteListFilter::Status(QuoteStatusDb::Quoted)),
        Some("accepted") => Ok(QuoteListFilter::Status(QuoteStatusDb::Accepted)),
        Some("rejected") => Ok(QuoteListFilter::Status(QuoteStatusDb::Rejected)),
        Some("user_declined") => Ok(QuoteListFilter::Status(QuoteStatusDb::UserDeclined)),
        Some("counter_offer") => Ok(QuoteListFilter::CounterOffer),
        Some(other) => Err(ApiError::Validation(format!(
            "Unknown status filter: {}",
            other
        ))),
    }
}

/// List quote requests, optionally filtered by display status.
pub async fn list_quotes(
    State(state): State<AppState>,
    Query(query): Query<ListQuotesQuery>,
) -> Result<Json<ListQuotesResponse>, ApiError> {
    let filter = parse_status_filter(query.status.as_deref())?;
    let per_page = query.per_page.clamp(1, state.config.limits.max_page_size);
    let page = query.page.max(1);
    let offset = (page - 1) * per_page;

    let repository = QuoteRepository::new(state.pool.clone());
    let data: Vec<QuoteRequest> = repository
        .list(filter, per_page, offset)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = repository.count(filter).await?;

    Ok(Json(ListQuotesResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
        },
    }))
}

/// Fetch a single quote with its conversation log.
pub async fn get_quote(
    State(state): State<AppState>,
    Path(quote_id): Path<Uuid>,
) -> Result<Json<QuoteDetailResponse>, ApiError> {
    let entity = QuoteRepository::new(state.pool.clone())
        .find_by_id(quote_id)
        .await?
        .ok_or_else(quote_not_found)?;

    let messages = load_messages(&state, quote_id, Locale::En).await?;

    Ok(Json(QuoteDetailResponse {
        quote: entity.into(),
        messages,
    }))
}

/// Price a quote: set the offer, log the admin message and notify the
/// customer.
pub async fn set_offer(
    State(state): State<AppState>,
    Path(quote_id): Path<Uuid>,
    Json(request): Json<AdminSetOfferRequest>,
) -> Result<Json<QuoteRequest>, ApiError> {
    if request.quoted_price <= Decimal::ZERO {
        return Err(ApiError::Validation(
            "Quoted price must be positive".to_string(),
        ));
    }

    let repository = QuoteRepository::new(state.pool.clone());
    let quote = repository
        .find_by_id(quote_id)
        .await?
        .ok_or_else(quote_not_found)?;

    // Attaching a coupon is part of the offer itself: a code that fails
    // validation rejects the whole request rather than silently dropping
    // the discount. Per-user limits count against the quote's customer
    // email, the same identity redemptions are recorded under.
    let coupon = match request
        .coupon_code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
    {
        Some(raw_code) => {
            let code = shared::validation::normalize_coupon_code(raw_code);
            let coupon: Coupon = CouponRepository::new(state.pool.clone())
                .find_by_code(&code)
                .await?
                .ok_or(domain::models::CouponError::NotFound)?
                .into();
            let usage = CouponRedemptionRepository::new(state.pool.clone())
                .usage(coupon.id, Some(&quote.customer_email))
                .await?;
            validate_for_quote(&coupon, request.quoted_price, &usage, Utc::now())?;
            Some(coupon)
        }
        None => None,
    };

    let attached = coupon.as_ref().map(|c| AttachedCoupon {
        code: c.code.clone(),
        discount_label: discount_label(c),
    });

    let updated = repository
        .set_offer(
            quote_id,
            request.quoted_price,
            request.admin_notes.as_deref(),
            coupon.as_ref().map(|c| c.id),
        )
        .await?
        .ok_or_else(quote_not_found)?;

    // Secondary writes: admin message, then the stored notification.
    let message = compose_offer_message(
        request.admin_notes.as_deref(),
        request.quoted_price,
        attached.as_ref(),
    );
    log_non_critical(
        "append_offer_message",
        QuoteMessageRepository::new(state.pool.clone())
            .append(
                quote_id,
                SenderTypeDb::Admin,
                &message,
                Some(request.quoted_price),
            )
            .await,
    );

    let payload = QuoteOfferPayload {
        notification_type: NotificationType::QuoteOffer,
        quote_id,
        quote_number: updated.quote_number.clone(),
        price: round2(request.quoted_price),
        coupon_code: attached.as_ref().map(|c| c.code.clone()),
        link: format!("/quotes/{}", quote_id),
    };
    let notifier =
        StoredNotificationService::new(NotificationRepository::new(state.pool.clone()));
    if let NotificationResult::Failed(err) = notifier
        .send_quote_offer(&updated.customer_email, payload)
        .await
    {
        tracing::warn!(quote_id = %quote_id, error = %err, "Quote offer notification failed");
    }

    tracing::info!(quote_id = %quote_id, price = %request.quoted_price, "Offer set");

    Ok(Json(updated.into()))
}

/// Manually edit quote fields. Produces no conversation-log entry.
pub async fn update_quote(
    State(state): State<AppState>,
    Path(quote_id): Path<Uuid>,
    Json(request): Json<AdminUpdateQuoteRequest>,
) -> Result<Json<QuoteRequest>, ApiError> {
    if let Some(price) = request.quoted_price {
        if price <= Decimal::ZERO {
            return Err(ApiError::Validation(
                "Quoted price must be positive".to_string(),
            ));
        }
    }

    let updated = QuoteRepository::new(state.pool.clone())
        .update_fields(
            quote_id,
            request.status.map(Into::into),
            request.quoted_price,
            request.admin_notes.as_deref(),
        )
        .await?
        .ok_or_else(quote_not_found)?;

    Ok(Json(updated.into()))
}

/// Delete a quote and its conversation log.
pub async fn delete_quote(
    State(state): State<AppState>,
    Path(quote_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let removed = QuoteRepository::new(state.pool.clone())
        .delete(quote_id)
        .await?;
    if removed == 0 {
        return Err(quote_not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}

fn quote_not_found() -> ApiError {
    ApiError::NotFound("Quote not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_filter_stored_statuses() {
        assert_eq!(
            parse_status_filter(Some("quoted")).unwrap(),
            QuoteListFilter::Status(QuoteStatusDb::Quoted)
        );
        assert_eq!(
            parse_status_filter(Some("user_declined")).unwrap(),
            QuoteListFilter::Status(QuoteStatusDb::UserDeclined)
        );
        assert_eq!(parse_status_filter(None).unwrap(), QuoteListFilter::All);
    }

    #[test]
    fn test_parse_status_filter_counter_offer() {
        assert_eq!(
            parse_status_filter(Some("counter_offer")).unwrap(),
            QuoteListFilter::CounterOffer
        );
    }

    #[test]
    fn test_parse_status_filter_unknown() {
        assert!(matches!(
            parse_status_filter(Some("archived")),
            Err(ApiError::Validation(_))
        ));
    }
}
