//! Order arithmetic and small display helpers.

use rust_decimal::Decimal;

/// Default sales tax rate (10%).
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

const BASE_SHIPPING: Decimal = Decimal::from_parts(10, 0, 0, false, 0);
const SHIPPING_PER_KG: Decimal = Decimal::from_parts(5, 0, 0, false, 1);
const DOMESTIC_COUNTRY: &str = "US";

/// Tax on a subtotal at the given rate.
#[must_use]
pub fn calculate_tax(subtotal: Decimal, rate: Decimal) -> Decimal {
    subtotal.saturating_mul(rate).round_dp(2)
}

/// Flat base plus a per-kilogram charge, doubled for shipments outside the US.
#[must_use]
pub fn calculate_shipping(weight_kg: Decimal, country: &str) -> Decimal {
    let domestic = BASE_SHIPPING.saturating_add(weight_kg.saturating_mul(SHIPPING_PER_KG));
    if country.eq_ignore_ascii_case(DOMESTIC_COUNTRY) {
        domestic
    } else {
        domestic.saturating_mul(Decimal::TWO)
    }
}

/// Subtotal, tax, shipping and grand total for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSummary {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

impl OrderSummary {
    /// An empty cart ships for free.
    #[must_use]
    pub fn new(subtotal: Decimal, tax_rate: Decimal, weight_kg: Decimal, country: &str) -> Self {
        let tax = calculate_tax(subtotal, tax_rate);
        let shipping = if subtotal.is_zero() {
            Decimal::ZERO
        } else {
            calculate_shipping(weight_kg, country)
        };
        Self {
            subtotal,
            tax,
            shipping,
            total: subtotal.saturating_add(tax).saturating_add(shipping),
        }
    }
}

/// Cut text to `max_chars` characters and append `...` if anything was cut.
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let kept: String = text.chars().take(max_chars).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_default_rate() {
        assert_eq!(DEFAULT_TAX_RATE, Decimal::new(10, 2));
        assert_eq!(
            calculate_tax(Decimal::new(67997, 2), DEFAULT_TAX_RATE),
            Decimal::new(6800, 2)
        );
    }

    #[test]
    fn test_shipping_domestic_and_international() {
        assert_eq!(calculate_shipping(Decimal::ZERO, "US"), Decimal::new(10, 0));
        assert_eq!(calculate_shipping(Decimal::new(2, 0), "us"), Decimal::new(11, 0));
        assert_eq!(calculate_shipping(Decimal::new(55, 1), "IN"), Decimal::new(2550, 2));
    }

    #[test]
    fn test_order_summary() {
        let summary = OrderSummary::new(Decimal::new(10000, 2), DEFAULT_TAX_RATE, Decimal::ZERO, "US");
        assert_eq!(summary.tax, Decimal::new(1000, 2));
        assert_eq!(summary.shipping, Decimal::new(10, 0));
        assert_eq!(summary.total, Decimal::new(12000, 2));

        let empty = OrderSummary::new(Decimal::ZERO, DEFAULT_TAX_RATE, Decimal::ZERO, "IN");
        assert_eq!(empty.total, Decimal::ZERO);
    }

    #[test]
    fn test_order_summary_saturates() {
        let summary = OrderSummary::new(Decimal::MAX, DEFAULT_TAX_RATE, Decimal::MAX, "IN");
        assert_eq!(summary.total, Decimal::MAX);
        assert_eq!(calculate_shipping(Decimal::MAX, "IN"), Decimal::MAX);
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("Pashmina", 8), "Pashmina");
        assert_eq!(truncate_text("Pashmina", 4), "Pash...");
        assert_eq!(truncate_text("Papier Mâché", 9), "Papier Mâ...");
        assert_eq!(truncate_text("", 0), "");
    }
}
