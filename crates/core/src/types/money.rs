//! Decimal money amounts with display formatting.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Currencies the store can be configured to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    /// Bangladeshi taka.
    #[default]
    BDT,
    USD,
}

impl CurrencyCode {
    /// Symbol prefixed to formatted amounts.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::BDT => "৳",
            Self::USD => "$",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::BDT => "BDT",
            Self::USD => "USD",
        }
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BDT" => Ok(Self::BDT),
            "USD" => Ok(Self::USD),
            other => Err(format!("unsupported currency: {other}")),
        }
    }
}

/// An amount of money in a given currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Money {
    pub amount: Decimal,
    pub currency: CurrencyCode,
}

impl Money {
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// Amount rounded to two places without the currency symbol (`1250.00`).
    #[must_use]
    pub fn plain(&self) -> String {
        format_plain(self.amount)
    }
}

/// Format a decimal with exactly two fraction digits, no grouping.
#[must_use]
pub fn format_plain(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

impl fmt::Display for Money {
    /// Formats as symbol, thousands-grouped integer part and two decimals:
    /// `৳1,250.00`, `-$3.50`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plain = format_plain(self.amount.abs());
        let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        let sign = if self.amount.is_sign_negative() && !self.amount.is_zero() {
            "-"
        } else {
            ""
        };
        write!(
            f,
            "{sign}{}{grouped}.{frac_part}",
            self.currency.symbol()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap_or_default()
    }

    #[test]
    fn test_display_groups_thousands() {
        let money = Money::new(dec("1250"), CurrencyCode::BDT);
        assert_eq!(money.to_string(), "৳1,250.00");

        let money = Money::new(dec("1234567.891"), CurrencyCode::USD);
        assert_eq!(money.to_string(), "$1,234,567.89");
    }

    #[test]
    fn test_display_small_and_negative() {
        assert_eq!(Money::new(dec("0"), CurrencyCode::USD).to_string(), "$0.00");
        assert_eq!(Money::new(dec("999.5"), CurrencyCode::USD).to_string(), "$999.50");
        assert_eq!(Money::new(dec("-3.5"), CurrencyCode::USD).to_string(), "-$3.50");
    }

    #[test]
    fn test_plain_rounds_half_away_from_zero() {
        assert_eq!(format_plain(dec("10.005")), "10.01");
        assert_eq!(format_plain(dec("7")), "7.00");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!(CurrencyCode::from_str("usd"), Ok(CurrencyCode::USD));
        assert_eq!(CurrencyCode::from_str(" BDT "), Ok(CurrencyCode::BDT));
        assert!(CurrencyCode::from_str("EUR").is_err());
    }
}
