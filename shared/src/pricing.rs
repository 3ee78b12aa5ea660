//! Special-offer pricing
//!
//! Uses rust_decimal for precise calculations. Offers always price from
//! `base_price`, so applying a second offer to the same product replaces
//! the first one instead of stacking on top of it.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Round a monetary value to cents
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Whether a discount percentage is acceptable for a special offer: (0, 100]
pub fn is_valid_discount(discount_percent: Decimal) -> bool {
    discount_percent > Decimal::ZERO && discount_percent <= Decimal::ONE_HUNDRED
}

/// Price after a percentage discount:
/// `round(base_price * (1 - discount_percent / 100), 2)`, never below zero.
pub fn discounted_price(base_price: Decimal, discount_percent: Decimal) -> Decimal {
    let multiplier = Decimal::ONE - discount_percent / Decimal::ONE_HUNDRED;
    round_money(base_price * multiplier).max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_twenty_percent_off_hundred() {
        assert_eq!(discounted_price(dec!(100.00), dec!(20)), dec!(80.00));
    }

    #[test]
    fn test_reapply_overwrites_not_compounds() {
        let base = dec!(100.00);
        let first = discounted_price(base, dec!(20));
        let second = discounted_price(base, dec!(10));
        assert_eq!(first, dec!(80.00));
        assert_eq!(second, dec!(90.00));
        // Compounding would have produced 72.00
        assert_ne!(second, discounted_price(first, dec!(10)));
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        // 19.99 * 0.85 = 16.9915
        assert_eq!(discounted_price(dec!(19.99), dec!(15)), dec!(16.99));
        // 0.05 * 0.5 = 0.025
        assert_eq!(discounted_price(dec!(0.05), dec!(50)), dec!(0.03));
        // 44.99 * 0.875 = 39.36625
        assert_eq!(discounted_price(dec!(44.99), dec!(12.5)), dec!(39.37));
    }

    #[test]
    fn test_full_discount_is_free() {
        assert_eq!(discounted_price(dec!(59.95), dec!(100)), Decimal::ZERO);
    }

    #[test]
    fn test_discount_bounds() {
        assert!(!is_valid_discount(dec!(0)));
        assert!(is_valid_discount(dec!(0.5)));
        assert!(is_valid_discount(dec!(100)));
        assert!(!is_valid_discount(dec!(100.01)));
        assert!(!is_valid_discount(dec!(-5)));
    }
}
