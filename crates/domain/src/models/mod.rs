//! Domain models for the Printshop backend.

pub mod coupon;
pub mod notification;
pub mod product;
pub mod quote;
pub mod quote_message;

pub use coupon::{Coupon, CouponError, CouponType, CouponUsage, Discount, ValidateCouponRequest};
pub use notification::{NotificationType, QuoteOfferPayload};
pub use product::ProductPricing;
pub use quote::{derive_display_status, DisplayStatus, QuoteRequest, QuoteStatus};
pub use quote_message::{MessagePayload, QuoteMessage, SenderType};
