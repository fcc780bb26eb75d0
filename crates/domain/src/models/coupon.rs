//! Coupon domain models and the discount error taxonomy.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

/// How a coupon's value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CouponType {
    /// `value` is a percentage of the price, 0-100.
    Percentage,
    /// `value` is a currency amount; `currency` must match the product's.
    Fixed,
}

impl std::fmt::Display for CouponType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CouponType::Percentage => write!(f, "percentage"),
            CouponType::Fixed => write!(f, "fixed"),
        }
    }
}

/// A discount definition.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Coupon {
    pub id: Uuid,
    /// Stored normalized uppercase; lookups are case-insensitive.
    pub code: String,
    pub coupon_type: CouponType,
    pub value: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_purchase: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_user_limit: Option<i32>,
    /// Product scope; an empty set means the coupon applies to all products.
    pub product_ids: Vec<Uuid>,
    pub allow_on_sale: bool,
    pub show_on_product: bool,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Usage counts for a coupon, computed from the redemption log.
#[derive(Debug, Clone, Copy, Default)]
pub struct CouponUsage {
    pub total: i64,
    pub by_customer: i64,
}

/// Why a coupon cannot be applied. Callers branch on [`CouponError::code`];
/// the variants are ordered the way validation short-circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CouponError {
    #[error("Coupon code not found")]
    NotFound,
    #[error("This coupon is no longer active")]
    Inactive,
    #[error("This coupon is not valid yet")]
    NotStarted,
    #[error("This coupon has expired")]
    Expired,
    #[error("This coupon has reached its usage limit")]
    MaxUses,
    #[error("You have already used this coupon the maximum number of times")]
    UserLimit,
    #[error("This coupon does not apply to this product")]
    WrongProduct,
    #[error("This coupon cannot be combined with a sale price")]
    NotOnSale,
    #[error("The order total is below this coupon's minimum")]
    MinPurchase,
    #[error("This coupon is issued in a different currency")]
    CurrencyMismatch,
}

impl CouponError {
    /// Machine-readable error code, stable across the API surface.
    pub fn code(&self) -> &'static str {
        match self {
            CouponError::NotFound => "NOT_FOUND",
            CouponError::Inactive => "INACTIVE",
            CouponError::NotStarted => "NOT_STARTED",
            CouponError::Expired => "EXPIRED",
            CouponError::MaxUses => "MAX_USES",
            CouponError::UserLimit => "USER_LIMIT",
            CouponError::WrongProduct => "WRONG_PRODUCT",
            CouponError::NotOnSale => "NOT_ON_SALE",
            CouponError::MinPurchase => "MIN_PURCHASE",
            CouponError::CurrencyMismatch => "CURRENCY_MISMATCH",
        }
    }
}

/// A validated, priced discount.
///
/// Monetary fields are decimal strings rounded to 2 places so client and
/// server never disagree over floating-point representations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Discount {
    pub coupon_id: Uuid,
    pub code: String,
    pub coupon_type: CouponType,
    pub value: Decimal,
    pub original: String,
    pub discount_amount: String,
    #[serde(rename = "final")]
    pub final_price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Request body for coupon validation (preview and checkout re-validation).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ValidateCouponRequest {
    pub code: String,
    pub product_id: Uuid,
    #[serde(default)]
    pub customer_id: Option<String>,
}

/// Request to create a coupon (admin).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateCouponRequest {
    #[validate(length(min = 2, max = 32))]
    pub code: String,
    pub coupon_type: CouponType,
    pub value: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub min_purchase: Option<Decimal>,
    #[serde(default)]
    pub max_uses: Option<i32>,
    #[serde(default)]
    pub per_user_limit: Option<i32>,
    #[serde(default)]
    pub product_ids: Vec<Uuid>,
    #[serde(default)]
    pub allow_on_sale: bool,
    #[serde(default)]
    pub show_on_product: bool,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl CreateCouponRequest {
    /// Returns the canonical uppercase code, validating its charset.
    pub fn normalized_code(&self) -> Result<String, String> {
        let code = shared::validation::normalize_coupon_code(&self.code);
        shared::validation::validate_coupon_code(&code)
            .map_err(|e| e.message.map(|m| m.to_string()).unwrap_or_default())?;
        Ok(code)
    }

    /// Cross-field checks the `validator` derive cannot express.
    pub fn validate_semantics(&self) -> Result<(), String> {
        match self.coupon_type {
            CouponType::Percentage => {
                if self.value <= Decimal::ZERO || self.value > Decimal::from(100) {
                    return Err("Percentage value must be between 0 and 100".to_string());
                }
            }
            CouponType::Fixed => {
                if self.value <= Decimal::ZERO {
                    return Err("Fixed value must be positive".to_string());
                }
                if self.currency.is_none() {
                    return Err("Fixed coupons require a currency".to_string());
                }
            }
        }
        if let (Some(starts), Some(expires)) = (self.starts_at, self.expires_at) {
            if expires <= starts {
                return Err("expires_at must be after starts_at".to_string());
            }
        }
        Ok(())
    }
}

/// Request to update a coupon (admin); absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UpdateCouponRequest {
    #[serde(default)]
    pub value: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub min_purchase: Option<Decimal>,
    #[serde(default)]
    pub max_uses: Option<i32>,
    #[serde(default)]
    pub per_user_limit: Option<i32>,
    #[serde(default)]
    pub product_ids: Option<Vec<Uuid>>,
    #[serde(default)]
    pub allow_on_sale: Option<bool>,
    #[serde(default)]
    pub show_on_product: Option<bool>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coupon_type_display() {
        assert_eq!(CouponType::Percentage.to_string(), "percentage");
        assert_eq!(CouponType::Fixed.to_string(), "fixed");
    }

    #[test]
    fn test_coupon_error_codes_are_distinct() {
        let errors = [
            CouponError::NotFound,
            CouponError::Inactive,
            CouponError::NotStarted,
            CouponError::Expired,
            CouponError::MaxUses,
            CouponError::UserLimit,
            CouponError::WrongProduct,
            CouponError::NotOnSale,
            CouponError::MinPurchase,
            CouponError::CurrencyMismatch,
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_discount_serializes_final_field_name() {
        let discount = Discount {
            coupon_id: Uuid::nil(),
            code: "SAVE10".to_string(),
            coupon_type: CouponType::Percentage,
            value: Decimal::from(10),
            original: "49.99".to_string(),
            discount_amount: "5.00".to_string(),
            final_price: "44.99".to_string(),
            currency: Some("EUR".to_string()),
        };
        let json = serde_json::to_string(&discount).unwrap();
        assert!(json.contains(r#""final":"44.99""#));
        assert!(!json.contains("final_price"));
    }

    #[test]
    fn test_create_coupon_semantics_percentage_range() {
        let mut req = CreateCouponRequest {
            code: "SAVE10".to_string(),
            coupon_type: CouponType::Percentage,
            value: Decimal::from(10),
            currency: None,
            min_purchase: None,
            max_uses: None,
            per_user_limit: None,
            product_ids: vec![],
            allow_on_sale: false,
            show_on_product: false,
            active: true,
            starts_at: None,
            expires_at: None,
        };
        assert!(req.validate_semantics().is_ok());

        req.value = Decimal::from(101);
        assert!(req.validate_semantics().is_err());
    }

    #[test]
    fn test_normalized_code() {
        let mut req = CreateCouponRequest {
            code: "save10".to_string(),
            coupon_type: CouponType::Percentage,
            value: Decimal::from(10),
            currency: None,
            min_purchase: None,
            max_uses: None,
            per_user_limit: None,
            product_ids: vec![],
            allow_on_sale: false,
            show_on_product: false,
            active: true,
            starts_at: None,
            expires_at: None,
        };
        assert_eq!(req.normalized_code().unwrap(), "SAVE10");

        req.code = "bad code".to_string();
        assert!(req.normalized_code().is_err());
    }

    #[test]
    fn test_create_coupon_semantics_fixed_requires_currency() {
        let req = CreateCouponRequest {
            code: "MINUS5".to_string(),
            coupon_type: CouponType::Fixed,
            value: Decimal::from(5),
            currency: None,
            min_purchase: None,
            max_uses: None,
            per_user_limit: None,
            product_ids: vec![],
            allow_on_sale: false,
            show_on_product: false,
            active: true,
            starts_at: None,
            expires_at: None,
        };
        assert!(req.validate_semantics().is_err());
    }
}
