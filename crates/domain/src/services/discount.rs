//! Coupon validation and discount computation.
//!
//! The same pricing arithmetic backs three call sites that must never
//! disagree: product-page preview, checkout-time re-validation and admin
//! quote offers. Checks short-circuit in a fixed order; the first failing
//! check wins.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::coupon::{Coupon, CouponError, CouponType, CouponUsage, Discount};
use crate::models::product::ProductPricing;

/// Rounds a monetary value to 2 decimal places, midpoint away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats a monetary value as a 2-decimal string for wire payloads.
pub fn format_money(value: Decimal) -> String {
    format!("{:.2}", round2(value))
}

/// Computes `(discount_amount, final_price)` for a coupon against a price.
///
/// Percentage: `round2(original * value / 100)`. Fixed: `min(value, original)`,
/// never discounting below zero.
pub fn compute_discount(
    coupon_type: CouponType,
    value: Decimal,
    original: Decimal,
) -> (Decimal, Decimal) {
    let discount = match coupon_type {
        CouponType::Percentage => round2(original * value / Decimal::from(100)),
        CouponType::Fixed => round2(value.min(original)),
    };
    let final_price = (original - discount).max(Decimal::ZERO);
    (discount, final_price)
}

/// Short human label for a coupon's discount, e.g. `10%` or `5.00 EUR`.
pub fn discount_label(coupon: &Coupon) -> String {
    match coupon.coupon_type {
        CouponType::Percentage => format!("{}%", coupon.value.normalize()),
        CouponType::Fixed => match &coupon.currency {
            Some(currency) => format!("{} {}", format_money(coupon.value), currency),
            None => format_money(coupon.value),
        },
    }
}

/// Checks shared by every call site: active flag, validity window, total
/// usage cap. Order matters and must not change.
fn check_basic_eligibility(
    coupon: &Coupon,
    total_uses: i64,
    now: DateTime<Utc>,
) -> Result<(), CouponError> {
    if !coupon.active {
        return Err(CouponError::Inactive);
    }
    if let Some(starts_at) = coupon.starts_at {
        if starts_at > now {
            return Err(CouponError::NotStarted);
        }
    }
    if let Some(expires_at) = coupon.expires_at {
        if expires_at <= now {
            return Err(CouponError::Expired);
        }
    }
    if let Some(max_uses) = coupon.max_uses {
        if total_uses >= i64::from(max_uses) {
            return Err(CouponError::MaxUses);
        }
    }
    Ok(())
}

/// Validates a coupon against a product and customer context and computes
/// the discounted price.
///
/// The coupon has already been looked up by normalized code; an absent code
/// is the caller's `NOT_FOUND`. Remaining checks run in spec order:
/// INACTIVE, NOT_STARTED, EXPIRED, MAX_USES, USER_LIMIT, WRONG_PRODUCT,
/// NOT_ON_SALE, MIN_PURCHASE, CURRENCY_MISMATCH.
pub fn validate_and_price(
    coupon: &Coupon,
    product: &ProductPricing,
    usage: &CouponUsage,
    now: DateTime<Utc>,
) -> Result<Discount, CouponError> {
    check_basic_eligibility(coupon, usage.total, now)?;

    if let Some(per_user_limit) = coupon.per_user_limit {
        if usage.by_customer >= i64::from(per_user_limit) {
            return Err(CouponError::UserLimit);
        }
    }
    if !coupon.product_ids.is_empty() && !coupon.product_ids.contains(&product.id) {
        return Err(CouponError::WrongProduct);
    }
    if product.on_sale && !coupon.allow_on_sale {
        return Err(CouponError::NotOnSale);
    }

    let original = product.effective_price();

    if let Some(min_purchase) = coupon.min_purchase {
        if original < min_purchase {
            return Err(CouponError::MinPurchase);
        }
    }
    if coupon.coupon_type == CouponType::Fixed {
        if let Some(currency) = &coupon.currency {
            if currency != &product.currency {
                return Err(CouponError::CurrencyMismatch);
            }
        }
    }

    let (discount_amount, final_price) = compute_discount(coupon.coupon_type, coupon.value, original);

    Ok(Discount {
        coupon_id: coupon.id,
        code: coupon.code.clone(),
        coupon_type: coupon.coupon_type,
        value: coupon.value,
        original: format_money(original),
        discount_amount: format_money(discount_amount),
        final_price: format_money(final_price),
        currency: Some(product.currency.clone()),
    })
}

/// Validates a coupon for attachment to a freeform quote offer.
///
/// Quotes carry no product, so the product-scope, sale and currency checks
/// do not apply. Everything computable still runs: the minimum purchase is
/// checked against the quoted price and the per-user limit against usage
/// recorded under the quote's customer email. The discount arithmetic is
/// the same one used everywhere else.
pub fn validate_for_quote(
    coupon: &Coupon,
    quoted_price: Decimal,
    usage: &CouponUsage,
    now: DateTime<Utc>,
) -> Result<Discount, CouponError> {
    check_basic_eligibility(coupon, usage.total, now)?;

    if let Some(per_user_limit) = coupon.per_user_limit {
        if usage.by_customer >= i64::from(per_user_limit) {
            return Err(CouponError::UserLimit);
        }
    }

    let original = round2(quoted_price);

    if let Some(min_purchase) = coupon.min_purchase {
        if original < min_purchase {
            return Err(CouponError::MinPurchase);
        }
    }

    let (discount_amount, final_price) = compute_discount(coupon.coupon_type, coupon.value, original);

    Ok(Discount {
        coupon_id: coupon.id,
        code: coupon.code.clone(),
        coupon_type: coupon.coupon_type,
        value: coupon.value,
        original: format_money(original),
        discount_amount: format_money(discount_amount),
        final_price: format_money(final_price),
        currency: coupon.currency.clone(),
    })
}

/// Picks the promotional coupon to badge a product with.
///
/// Product-scoped coupons win over global ones; coupons that disallow sale
/// stacking are skipped for on-sale products. Only active, in-window,
/// displayable coupons participate. Not a correctness-critical path.
pub fn best_coupon_for_product<'a>(
    product: &ProductPricing,
    coupons: &'a [Coupon],
    now: DateTime<Utc>,
) -> Option<&'a Coupon> {
    let mut global: Option<&Coupon> = None;

    for coupon in coupons {
        if !coupon.show_on_product || check_basic_eligibility(coupon, 0, now).is_err() {
            continue;
        }
        if product.on_sale && !coupon.allow_on_sale {
            continue;
        }
        if coupon.product_ids.contains(&product.id) {
            return Some(coupon);
        }
        if coupon.product_ids.is_empty() && global.is_none() {
            global = Some(coupon);
        }
    }

    global
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn coupon(coupon_type: CouponType, value: &str) -> Coupon {
        let now = Utc::now();
        Coupon {
            id: Uuid::new_v4(),
            code: "SAVE10".to_string(),
            coupon_type,
            value: d(value),
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
            created_at: now,
            updated_at: now,
        }
    }

    fn product() -> ProductPricing {
        ProductPricing {
            id: Uuid::new_v4(),
            name: "Benchy".to_string(),
            price: d("49.99"),
            sale_price: None,
            on_sale: false,
            currency: "EUR".to_string(),
        }
    }

    #[test]
    fn test_percentage_discount_arithmetic() {
        let c = coupon(CouponType::Percentage, "10");
        let result = validate_and_price(&c, &product(), &CouponUsage::default(), Utc::now()).unwrap();
        assert_eq!(result.original, "49.99");
        assert_eq!(result.discount_amount, "5.00");
        assert_eq!(result.final_price, "44.99");
        assert_eq!(result.currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn test_percentage_final_plus_discount_equals_original() {
        for (price, pct) in [("49.99", "10"), ("0.03", "33"), ("19.95", "7.5"), ("100.00", "100")] {
            let mut p = product();
            p.price = d(price);
            let c = coupon(CouponType::Percentage, pct);
            let result = validate_and_price(&c, &p, &CouponUsage::default(), Utc::now()).unwrap();
            let final_price: Decimal = result.final_price.parse().unwrap();
            let discount: Decimal = result.discount_amount.parse().unwrap();
            assert_eq!(final_price + discount, d(price), "price={price} pct={pct}");
        }
    }

    #[test]
    fn test_fixed_discount_capped_at_price() {
        let mut c = coupon(CouponType::Fixed, "60.00");
        c.currency = Some("EUR".to_string());
        let result = validate_and_price(&c, &product(), &CouponUsage::default(), Utc::now()).unwrap();
        assert_eq!(result.discount_amount, "49.99");
        assert_eq!(result.final_price, "0.00");
    }

    #[test]
    fn test_fixed_discount_normal() {
        let mut c = coupon(CouponType::Fixed, "5.00");
        c.currency = Some("EUR".to_string());
        let result = validate_and_price(&c, &product(), &CouponUsage::default(), Utc::now()).unwrap();
        assert_eq!(result.discount_amount, "5.00");
        assert_eq!(result.final_price, "44.99");
    }

    #[test]
    fn test_inactive_wins_over_expired() {
        // Both conditions fail; the earlier check in the order must report.
        let mut c = coupon(CouponType::Percentage, "10");
        c.active = false;
        c.expires_at = Some(Utc::now() - Duration::days(1));
        let err = validate_and_price(&c, &product(), &CouponUsage::default(), Utc::now()).unwrap_err();
        assert_eq!(err, CouponError::Inactive);
    }

    #[test]
    fn test_not_started() {
        let mut c = coupon(CouponType::Percentage, "10");
        c.starts_at = Some(Utc::now() + Duration::days(1));
        let err = validate_and_price(&c, &product(), &CouponUsage::default(), Utc::now()).unwrap_err();
        assert_eq!(err, CouponError::NotStarted);
    }

    #[test]
    fn test_expired() {
        let mut c = coupon(CouponType::Percentage, "10");
        c.expires_at = Some(Utc::now() - Duration::hours(1));
        let err = validate_and_price(&c, &product(), &CouponUsage::default(), Utc::now()).unwrap_err();
        assert_eq!(err, CouponError::Expired);
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        // The window is [starts_at, expires_at): an expiry equal to `now`
        // is already expired.
        let now = Utc::now();
        let mut c = coupon(CouponType::Percentage, "10");
        c.expires_at = Some(now);
        let err = validate_and_price(&c, &product(), &CouponUsage::default(), now).unwrap_err();
        assert_eq!(err, CouponError::Expired);

        c.expires_at = None;
        c.starts_at = Some(now);
        assert!(validate_and_price(&c, &product(), &CouponUsage::default(), now).is_ok());
    }

    #[test]
    fn test_max_uses_reached() {
        let mut c = coupon(CouponType::Percentage, "10");
        c.max_uses = Some(3);
        let usage = CouponUsage { total: 3, by_customer: 0 };
        let err = validate_and_price(&c, &product(), &usage, Utc::now()).unwrap_err();
        assert_eq!(err, CouponError::MaxUses);
    }

    #[test]
    fn test_max_uses_precedes_user_limit() {
        let mut c = coupon(CouponType::Percentage, "10");
        c.max_uses = Some(3);
        c.per_user_limit = Some(1);
        let usage = CouponUsage { total: 3, by_customer: 1 };
        let err = validate_and_price(&c, &product(), &usage, Utc::now()).unwrap_err();
        assert_eq!(err, CouponError::MaxUses);
    }

    #[test]
    fn test_user_limit_reached() {
        let mut c = coupon(CouponType::Percentage, "10");
        c.per_user_limit = Some(1);
        let usage = CouponUsage { total: 1, by_customer: 1 };
        let err = validate_and_price(&c, &product(), &usage, Utc::now()).unwrap_err();
        assert_eq!(err, CouponError::UserLimit);
    }

    #[test]
    fn test_wrong_product() {
        let mut c = coupon(CouponType::Percentage, "10");
        c.product_ids = vec![Uuid::new_v4()];
        let err = validate_and_price(&c, &product(), &CouponUsage::default(), Utc::now()).unwrap_err();
        assert_eq!(err, CouponError::WrongProduct);
    }

    #[test]
    fn test_scoped_coupon_matching_product_passes() {
        let p = product();
        let mut c = coupon(CouponType::Percentage, "10");
        c.product_ids = vec![Uuid::new_v4(), p.id];
        assert!(validate_and_price(&c, &p, &CouponUsage::default(), Utc::now()).is_ok());
    }

    #[test]
    fn test_not_on_sale_regardless_of_other_fields() {
        let mut p = product();
        p.on_sale = true;
        p.sale_price = Some(d("39.99"));
        let c = coupon(CouponType::Percentage, "10");
        let err = validate_and_price(&c, &p, &CouponUsage::default(), Utc::now()).unwrap_err();
        assert_eq!(err, CouponError::NotOnSale);
    }

    #[test]
    fn test_allow_on_sale_discounts_the_sale_price() {
        let mut p = product();
        p.on_sale = true;
        p.sale_price = Some(d("40.00"));
        let mut c = coupon(CouponType::Percentage, "10");
        c.allow_on_sale = true;
        let result = validate_and_price(&c, &p, &CouponUsage::default(), Utc::now()).unwrap();
        assert_eq!(result.original, "40.00");
        assert_eq!(result.discount_amount, "4.00");
        assert_eq!(result.final_price, "36.00");
    }

    #[test]
    fn test_min_purchase() {
        let mut c = coupon(CouponType::Percentage, "10");
        c.min_purchase = Some(d("50.00"));
        let err = validate_and_price(&c, &product(), &CouponUsage::default(), Utc::now()).unwrap_err();
        assert_eq!(err, CouponError::MinPurchase);
    }

    #[test]
    fn test_currency_mismatch() {
        let mut c = coupon(CouponType::Fixed, "5.00");
        c.currency = Some("USD".to_string());
        let err = validate_and_price(&c, &product(), &CouponUsage::default(), Utc::now()).unwrap_err();
        assert_eq!(err, CouponError::CurrencyMismatch);
    }

    #[test]
    fn test_min_purchase_precedes_currency_mismatch() {
        let mut c = coupon(CouponType::Fixed, "5.00");
        c.currency = Some("USD".to_string());
        c.min_purchase = Some(d("100.00"));
        let err = validate_and_price(&c, &product(), &CouponUsage::default(), Utc::now()).unwrap_err();
        assert_eq!(err, CouponError::MinPurchase);
    }

    #[test]
    fn test_validate_for_quote_reuses_arithmetic() {
        let c = coupon(CouponType::Percentage, "10");
        let result = validate_for_quote(&c, d("49.99"), &CouponUsage::default(), Utc::now()).unwrap();
        assert_eq!(result.original, "49.99");
        assert_eq!(result.discount_amount, "5.00");
        assert_eq!(result.final_price, "44.99");
        assert!(result.currency.is_none());
    }

    #[test]
    fn test_validate_for_quote_still_checks_eligibility() {
        let mut c = coupon(CouponType::Percentage, "10");
        c.active = false;
        assert_eq!(
            validate_for_quote(&c, d("49.99"), &CouponUsage::default(), Utc::now()).unwrap_err(),
            CouponError::Inactive
        );

        c.active = true;
        c.max_uses = Some(1);
        let usage = CouponUsage { total: 1, by_customer: 0 };
        assert_eq!(
            validate_for_quote(&c, d("49.99"), &usage, Utc::now()).unwrap_err(),
            CouponError::MaxUses
        );
    }

    #[test]
    fn test_validate_for_quote_enforces_min_purchase() {
        let mut c = coupon(CouponType::Percentage, "50");
        c.min_purchase = Some(d("100.00"));
        assert_eq!(
            validate_for_quote(&c, d("49.99"), &CouponUsage::default(), Utc::now()).unwrap_err(),
            CouponError::MinPurchase
        );

        // At or above the minimum the discount goes through.
        let result = validate_for_quote(&c, d("100.00"), &CouponUsage::default(), Utc::now()).unwrap();
        assert_eq!(result.final_price, "50.00");
    }

    #[test]
    fn test_validate_for_quote_enforces_user_limit() {
        let mut c = coupon(CouponType::Percentage, "10");
        c.per_user_limit = Some(1);
        let usage = CouponUsage { total: 1, by_customer: 1 };
        assert_eq!(
            validate_for_quote(&c, d("49.99"), &usage, Utc::now()).unwrap_err(),
            CouponError::UserLimit
        );

        // A different customer with no prior redemptions is unaffected.
        let fresh = CouponUsage { total: 1, by_customer: 0 };
        assert!(validate_for_quote(&c, d("49.99"), &fresh, Utc::now()).is_ok());
    }

    #[test]
    fn test_discount_label() {
        let c = coupon(CouponType::Percentage, "10");
        assert_eq!(discount_label(&c), "10%");

        let mut fixed = coupon(CouponType::Fixed, "5");
        fixed.currency = Some("EUR".to_string());
        assert_eq!(discount_label(&fixed), "5.00 EUR");
    }

    #[test]
    fn test_best_coupon_prefers_product_scoped() {
        let p = product();
        let mut global = coupon(CouponType::Percentage, "5");
        global.show_on_product = true;
        let mut scoped = coupon(CouponType::Percentage, "10");
        scoped.show_on_product = true;
        scoped.product_ids = vec![p.id];

        let coupons = vec![global.clone(), scoped.clone()];
        let best = best_coupon_for_product(&p, &coupons, Utc::now()).unwrap();
        assert_eq!(best.id, scoped.id);
    }

    #[test]
    fn test_best_coupon_skips_sale_incompatible() {
        let mut p = product();
        p.on_sale = true;
        p.sale_price = Some(d("39.99"));

        let mut no_sale = coupon(CouponType::Percentage, "10");
        no_sale.show_on_product = true;
        let mut sale_ok = coupon(CouponType::Percentage, "5");
        sale_ok.show_on_product = true;
        sale_ok.allow_on_sale = true;

        let coupons = vec![no_sale, sale_ok.clone()];
        let best = best_coupon_for_product(&p, &coupons, Utc::now()).unwrap();
        assert_eq!(best.id, sale_ok.id);
    }

    #[test]
    fn test_best_coupon_ignores_hidden_and_inactive() {
        let p = product();
        let hidden = coupon(CouponType::Percentage, "10");
        let mut inactive = coupon(CouponType::Percentage, "10");
        inactive.show_on_product = true;
        inactive.active = false;

        let coupons = vec![hidden, inactive];
        assert!(best_coupon_for_product(&p, &coupons, Utc::now()).is_none());
    }
}
