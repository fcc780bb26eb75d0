//! Business logic services.

pub mod discount;
pub mod lifecycle;
pub mod localization;
pub mod notification;

pub use discount::{
    best_coupon_for_product, compute_discount, discount_label, format_money, round2,
    validate_and_price, validate_for_quote,
};
pub use lifecycle::{
    compose_offer_message, plan_customer_response, AttachedCoupon, CustomerAction, LifecycleError,
    ResponseTransition,
};
pub use localization::{localize_message, Locale};
pub use notification::{MockNotificationService, NotificationResult, NotificationService};
