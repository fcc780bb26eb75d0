//! Shared utilities and common types for the Printshop backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Request-level validation helpers (uploads, coupon codes)
//! - Quote reference number generation

pub mod reference;
pub mod validation;
