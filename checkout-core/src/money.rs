//! Currency display helpers.
//!
//! All internal arithmetic stays on exact [`Decimal`] values; rounding to two
//! decimal places happens here, at the display edge, and nowhere else.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount as a dollar string with exactly two decimal places.
///
/// Midpoints round away from zero, so `129.063` displays as `$129.06` and
/// `0.125` as `$0.13`.
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${:.2}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_two_decimal_places() {
        assert_eq!(format_usd(Decimal::new(11733, 2)), "$117.33");
        assert_eq!(format_usd(Decimal::ZERO), "$0.00");
        assert_eq!(format_usd(Decimal::new(5, 0)), "$5.00");
    }

    #[test]
    fn rounds_midpoints_away_from_zero() {
        // 129.063 -> 129.06, 0.125 -> 0.13
        assert_eq!(format_usd(Decimal::new(129_063, 3)), "$129.06");
        assert_eq!(format_usd(Decimal::new(125, 3)), "$0.13");
    }
}
