//! Minimal product pricing context for the discount engine.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// The slice of a product the discount engine needs: identity, price,
/// sale state and currency. Catalog management lives elsewhere.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProductPricing {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Decimal>,
    pub on_sale: bool,
    pub currency: String,
}

impl ProductPricing {
    /// The price a customer currently pays: sale price when on sale,
    /// list price otherwise.
    pub fn effective_price(&self) -> Decimal {
        if self.on_sale {
            self.sale_price.unwrap_or(self.price)
        } else {
            self.price
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn product(price: &str, sale_price: Option<&str>, on_sale: bool) -> ProductPricing {
        ProductPricing {
            id: Uuid::nil(),
            name: "Calibration cube".to_string(),
            price: d(price),
            sale_price: sale_price.map(d),
            on_sale,
            currency: "EUR".to_string(),
        }
    }

    #[test]
    fn test_effective_price_list() {
        assert_eq!(product("20.00", None, false).effective_price(), d("20.00"));
    }

    #[test]
    fn test_effective_price_on_sale() {
        assert_eq!(
            product("20.00", Some("15.00"), true).effective_price(),
            d("15.00")
        );
    }

    #[test]
    fn test_effective_price_on_sale_without_sale_price() {
        // Inconsistent row; fall back to list price rather than panic
        assert_eq!(product("20.00", None, true).effective_price(), d("20.00"));
    }
}
