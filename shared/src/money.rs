//! Money calculation utilities using rust_decimal for precision
//!
//! Cost arithmetic is done with `Decimal` at full precision. Values are
//! rounded to cents only when they leave the domain (file columns, console).

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
pub const DECIMAL_PLACES: u32 = 2;

/// Round to 2 decimal places, half-up, always carrying exactly 2 fractional digits
///
/// `225` becomes `225.00`, `40.2375` becomes `40.24`.
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(DECIMAL_PLACES);
    rounded
}

/// Render a monetary value the way it is written to order files
pub fn format_money(value: Decimal) -> String {
    round_money(value).to_string()
}

/// `amount * percent / 100`, unrounded
#[inline]
pub fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    amount * percent / Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(dec("40.2375")), dec("40.24"));
        assert_eq!(round_money(dec("0.125")), dec("0.13"));
        assert_eq!(round_money(dec("1.005")), dec("1.01"));
        assert_eq!(round_money(dec("2.004")), dec("2.00"));
    }

    #[test]
    fn test_format_money_pads_to_two_digits() {
        assert_eq!(format_money(dec("225")), "225.00");
        assert_eq!(format_money(dec("210.0")), "210.00");
        assert_eq!(format_money(dec("475.2375")), "475.24");
        assert_eq!(format_money(Decimal::ZERO), "0.00");
    }

    #[test]
    fn test_percent_of_keeps_precision() {
        assert_eq!(percent_of(dec("435"), dec("9.25")), dec("40.2375"));
    }
}
