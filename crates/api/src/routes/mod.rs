//! HTTP route handlers.

pub mod admin_coupons;
pub mod admin_quotes;
pub mod coupons;
pub mod health;
pub mod products;
pub mod quotes;
