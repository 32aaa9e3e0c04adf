//! Decimal prices and currency display.
//!
//! Money is always `rust_decimal::Decimal`. Binary floats would make the cart
//! total of `2 x 299.99 + 79.99` come out as `679.9699999999999`.

use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes the storefront can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    INR,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// All supported currencies, in selector order.
    pub const ALL: [Self; 6] = [
        Self::USD,
        Self::EUR,
        Self::GBP,
        Self::INR,
        Self::CAD,
        Self::AUD,
    ];

    /// The three-letter code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::INR => "INR",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }

    /// The display symbol placed before the amount.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::INR => "₹",
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unsupported currency: {s}"))
    }
}

/// Format an amount for display in the given currency.
///
/// Known currencies get their symbol and comma grouping (`$1,299.99`);
/// unknown codes fall back to `1,299.99 XYZ` so an arbitrary stored currency
/// never breaks rendering.
#[must_use]
pub fn format_price(amount: Decimal, currency: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let grouped = group_thousands(whole);

    match currency.parse::<CurrencyCode>() {
        Ok(code) => format!("{sign}{}{grouped}.{fraction}", code.symbol()),
        Err(_) => format!("{sign}{grouped}.{fraction} {currency}"),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd_with_grouping() {
        assert_eq!(format_price(Decimal::new(129_999, 2), "USD"), "$1,299.99");
        assert_eq!(format_price(Decimal::new(7999, 2), "USD"), "$79.99");
        assert_eq!(format_price(Decimal::ZERO, "USD"), "$0.00");
        assert_eq!(format_price(Decimal::new(123_456_789, 0), "USD"), "$123,456,789.00");
    }

    #[test]
    fn test_format_other_currencies() {
        assert_eq!(format_price(Decimal::new(24999, 2), "EUR"), "€249.99");
        assert_eq!(format_price(Decimal::new(24999, 2), "inr"), "₹249.99");
        assert_eq!(format_price(Decimal::new(10, 0), "JPY"), "10.00 JPY");
    }

    #[test]
    fn test_format_rounds_to_cents() {
        assert_eq!(format_price(Decimal::new(299_995, 4), "GBP"), "£30.00");
        assert_eq!(format_price(Decimal::new(-1050, 2), "USD"), "-$10.50");
    }

    #[test]
    fn test_currency_parse() {
        assert_eq!("usd".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }
}
