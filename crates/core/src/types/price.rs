//! Monetary amounts using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount with its ISO 4217 currency code.
///
/// Shopify sends amounts as decimal strings (`"19.90"`); `rust_decimal`
/// keeps them exact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub fn new(amount: Decimal, currency_code: impl Into<String>) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
        }
    }

    /// Narrow currency symbol, if the currency has one we know.
    #[must_use]
    pub fn narrow_symbol(&self) -> Option<&'static str> {
        match self.currency_code.as_str() {
            "USD" | "CAD" | "AUD" | "NZD" | "MXN" => Some("$"),
            "EUR" => Some("€"),
            "GBP" => Some("£"),
            "JPY" | "CNY" => Some("¥"),
            "INR" => Some("₹"),
            _ => None,
        }
    }

    /// Format for display (e.g., `$19.90`, or `19.90 CHF` without a symbol).
    #[must_use]
    pub fn display(&self) -> String {
        let amount = self.amount.round_dp(2);
        self.narrow_symbol().map_or_else(
            || format!("{amount:.2} {}", self.currency_code),
            |symbol| format!("{symbol}{amount:.2}"),
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Price range across a product's variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    /// Minimum price among all variants.
    pub min_variant_price: Money,
    /// Maximum price among all variants.
    pub max_variant_price: Money,
}

impl PriceRange {
    /// Whether every variant costs the same.
    #[must_use]
    pub fn is_single_price(&self) -> bool {
        self.min_variant_price == self.max_variant_price
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_money_deserializes_from_decimal_string() {
        let money: Money =
            serde_json::from_str(r#"{"amount":"19.9","currencyCode":"USD"}"#).unwrap();
        assert_eq!(money.amount, Decimal::new(199, 1));
        assert_eq!(money.display(), "$19.90");
    }

    #[test]
    fn test_money_display_without_symbol() {
        let money = Money::new(Decimal::new(5, 0), "CHF");
        assert_eq!(money.display(), "5.00 CHF");
    }

    #[test]
    fn test_single_price_range() {
        let price = Money::new(Decimal::new(1000, 2), "EUR");
        let range = PriceRange {
            min_variant_price: price.clone(),
            max_variant_price: price,
        };
        assert!(range.is_single_price());
        assert_eq!(range.min_variant_price.to_string(), "€10.00");
    }
}
