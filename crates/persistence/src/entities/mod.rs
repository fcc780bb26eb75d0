//! Database entity definitions.

pub mod coupon;
pub mod notification;
pub mod product;
pub mod quote;
pub mod quote_message;

pub use coupon::{CouponEntity, CouponTypeDb};
pub use notification::NotificationEntity;
pub use product::ProductPricingEntity;
pub use quote::{QuoteRequestEntity, QuoteStatusDb};
pub use quote_message::{QuoteMessageEntity, SenderTypeDb};
