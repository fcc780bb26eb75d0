//! Repository implementations for database operations.

pub mod coupon;
pub mod coupon_redemption;
pub mod notification;
pub mod product;
pub mod quote;
pub mod quote_message;

pub use coupon::CouponRepository;
pub use coupon_redemption::CouponRedemptionRepository;
pub use notification::NotificationRepository;
pub use product::ProductRepository;
pub use quote::{QuoteListFilter, QuoteRepository};
pub use quote_message::QuoteMessageRepository;
