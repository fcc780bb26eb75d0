//! Domain layer for the Printshop backend.
//!
//! This crate contains:
//! - Domain models (QuoteRequest, QuoteMessage, Coupon, ProductPricing)
//! - Business logic services (quote lifecycle, coupon discount engine,
//!   conversation-log localization)
//! - Domain error types

pub mod models;
pub mod services;
