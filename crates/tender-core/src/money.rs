//! Presentation rounding.
//!
//! Cascades and aggregations never round. These helpers are for display and
//! export boundaries only.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds an amount to cents, midpoint away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a percentage to `dp` decimal places, midpoint away from zero.
pub fn round_pct(pct: Decimal, dp: u32) -> Decimal {
    pct.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(dec!(1425.605)), dec!(1425.61));
        assert_eq!(round_money(dec!(1425.604)), dec!(1425.60));
        assert_eq!(round_money(dec!(2599080)), dec!(2599080));
    }

    #[test]
    fn test_round_pct() {
        assert_eq!(round_pct(dec!(40.35555), 2), dec!(40.36));
    }
}
