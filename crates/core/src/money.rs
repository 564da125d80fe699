//! Money

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::USD};
use thiserror::Error;

/// Number of decimal places in the currency's minor unit.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Largest price or rate accepted anywhere, one billion.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Errors raised while summing amounts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    /// A sum or product no longer fits in a decimal.
    #[error("amount overflowed")]
    Overflow,
}

/// Adds two amounts.
///
/// # Errors
///
/// Returns [`AmountError::Overflow`] when the sum does not fit.
pub fn checked_add(total: Decimal, amount: Decimal) -> Result<Decimal, AmountError> {
    total.checked_add(amount).ok_or(AmountError::Overflow)
}

/// Rounds an amount to the currency's minor unit, half away from zero.
///
/// Amounts in this crate are never negative, so this is round-half-up.
#[must_use]
pub fn round_to_minor(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::MidpointAwayFromZero);

    rounded.rescale(MINOR_UNIT_SCALE);

    rounded
}

/// Formats an amount for externally observed payloads, e.g. `"$30.00"` or
/// `"$1,250.00"`.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let rounded = round_to_minor(amount);

    i64::try_from(rounded.mantissa()).map_or_else(
        |_overflow| format!("${rounded}"),
        |minor| Money::from_minor(minor, USD).to_string(),
    )
}

/// Parses a non-negative decimal amount from boundary input.
///
/// Returns `None` for empty, non-numeric, negative or out of range input. A
/// leading `$` and `,` digit separators are accepted so that values echoed
/// back from rendered payloads parse.
#[must_use]
pub fn parse_non_negative(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed).replace(',', "");

    let amount = Decimal::from_str(&digits).ok()?;

    if amount < Decimal::ZERO || amount > MAX_AMOUNT {
        return None;
    }

    Some(amount.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up_to_cents() {
        assert_eq!(round_to_minor(Decimal::new(12345, 3)), Decimal::new(1235, 2));
        assert_eq!(round_to_minor(Decimal::new(12344, 3)), Decimal::new(1234, 2));
    }

    #[test]
    fn formats_with_two_decimals_and_dollar_sign() {
        assert_eq!(format_amount(Decimal::from(60)), "$60.00");
        assert_eq!(format_amount(Decimal::new(305, 1)), "$30.50");
        assert_eq!(format_amount(Decimal::ZERO), "$0.00");
    }

    #[test]
    fn formats_thousands_with_separators() {
        assert_eq!(format_amount(Decimal::new(125_000, 2)), "$1,250.00");
        assert_eq!(parse_non_negative("$1,250.00"), Some(Decimal::new(125_000, 2)));
    }

    #[test]
    fn parses_plain_and_prefixed_amounts() {
        assert_eq!(parse_non_negative("12.50"), Some(Decimal::new(1250, 2)));
        assert_eq!(parse_non_negative(" $7 "), Some(Decimal::from(7)));
        assert_eq!(parse_non_negative("0"), Some(Decimal::ZERO));
    }

    #[test]
    fn rejects_negative_and_non_numeric_amounts() {
        assert_eq!(parse_non_negative("-1"), None);
        assert_eq!(parse_non_negative("abc"), None);
        assert_eq!(parse_non_negative(""), None);
    }

    #[test]
    fn rejects_amounts_above_the_ceiling() {
        assert_eq!(parse_non_negative("1000000000"), Some(MAX_AMOUNT));
        assert_eq!(parse_non_negative("1000000000.01"), None);
        assert_eq!(parse_non_negative("79228162514264337593543950335"), None);
    }

    #[test]
    fn checked_add_reports_overflow() {
        assert_eq!(checked_add(Decimal::ONE, Decimal::TWO), Ok(Decimal::from(3)));
        assert_eq!(checked_add(Decimal::MAX, Decimal::ONE), Err(AmountError::Overflow));
    }
}
