//! Quote lifecycle planning.
//!
//! Pure transition logic for the quote negotiation workflow. Handlers call
//! `plan_customer_response` / `compose_offer_message` to obtain the target
//! status and the message/notification content, then apply the writes in
//! order (status mutation first, log and notify as swallowed secondaries).

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::quote::QuoteStatus;
use crate::models::quote_message::MessagePayload;
use crate::services::discount::format_money;

/// Customer-side action, carrying its message where one is meaningful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerAction {
    /// Any message body supplied alongside an accept is ignored.
    Accept,
    Decline { reason: Option<String> },
    CounterOffer { message: String },
}

/// Why a customer response was refused. Checked before any mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The quote is not in `quoted` status (or not theirs); callers surface
    /// this as a not-found-style failure without distinguishing the cause.
    #[error("Quote not found or cannot be responded to")]
    NotRespondable,
    #[error("A counter-offer requires a message")]
    EmptyCounterMessage,
}

/// Point-in-time view of the coupon attached to an offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedCoupon {
    pub code: String,
    /// Human label for the discount, e.g. `10%` or `5.00 EUR`.
    pub discount_label: String,
}

/// The planned outcome of a customer response: what to store and what to log.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseTransition {
    pub new_status: QuoteStatus,
    /// New value for the legacy `user_response` field, when the action sets one.
    pub user_response: Option<String>,
    pub payload: MessagePayload,
}

/// Plans a customer response against the current quote state.
///
/// Permitted only while the quote is `quoted`; everything else fails with
/// [`LifecycleError::NotRespondable`] before any write. The attached coupon
/// is supplementary: pass `None` when its lookup failed and the accept
/// message is simply recorded without coupon details.
pub fn plan_customer_response(
    current_status: QuoteStatus,
    quoted_price: Option<Decimal>,
    coupon: Option<&AttachedCoupon>,
    action: CustomerAction,
) -> Result<ResponseTransition, LifecycleError> {
    if current_status != QuoteStatus::Quoted {
        return Err(LifecycleError::NotRespondable);
    }

    match action {
        CustomerAction::Accept => Ok(ResponseTransition {
            new_status: QuoteStatus::Accepted,
            user_response: None,
            payload: MessagePayload::Accepted {
                price: quoted_price.map(format_money),
                coupon_code: coupon.map(|c| c.code.clone()),
                coupon_discount: coupon.map(|c| c.discount_label.clone()),
            },
        }),
        CustomerAction::Decline { reason } => {
            let reason = reason
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string);
            Ok(ResponseTransition {
                new_status: QuoteStatus::UserDeclined,
                user_response: reason.clone(),
                payload: MessagePayload::Declined { text: reason },
            })
        }
        CustomerAction::CounterOffer { message } => {
            let message = message.trim().to_string();
            if message.is_empty() {
                return Err(LifecycleError::EmptyCounterMessage);
            }
            Ok(ResponseTransition {
                new_status: QuoteStatus::Pending,
                user_response: Some(message.clone()),
                payload: MessagePayload::CounterOffer { text: message },
            })
        }
    }
}

/// Composes the plain-text admin message logged when an offer is issued.
///
/// Admin messages are authored in one language at composition time and are
/// not localized; each part goes on its own line.
pub fn compose_offer_message(
    admin_notes: Option<&str>,
    quoted_price: Decimal,
    coupon: Option<&AttachedCoupon>,
) -> String {
    let mut lines = Vec::with_capacity(3);
    if let Some(notes) = admin_notes.map(str::trim).filter(|n| !n.is_empty()) {
        lines.push(notes.to_string());
    }
    lines.push(format!("Offered price: {}", format_money(quoted_price)));
    if let Some(coupon) = coupon {
        lines.push(format!("Coupon {}: {} off", coupon.code, coupon.discount_label));
    }
    lines.join("\n")
}
