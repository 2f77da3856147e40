//! Discount and totals arithmetic.
//!
//! All monetary values are [`Decimal`]s with two fractional digits.
//! Rounding is half-up (midpoint away from zero) to match the currency
//! convention used throughout the marketplace - not banker's rounding.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits for monetary values.
pub const MONEY_SCALE: u32 = 2;

/// Compute the effective unit price after applying a percentage discount.
///
/// `price × (1 − discount/100)`, rounded half-up to cent precision.
/// A discount of `0` leaves the price unchanged; `100` yields `0.00`.
#[must_use]
pub fn effective_price(price: Decimal, discount_percentage: Decimal) -> Decimal {
    let factor = Decimal::ONE - (discount_percentage / Decimal::ONE_HUNDRED);
    (price * factor).round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Line total for a single order item: `unit_price × quantity`.
#[must_use]
pub fn line_total(unit_price: Decimal, quantity: u32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

/// Subtotal over `(unit_price, quantity)` pairs. Zero for an empty set.
#[must_use]
pub fn subtotal<I>(items: I) -> Decimal
where
    I: IntoIterator<Item = (Decimal, u32)>,
{
    items
        .into_iter()
        .map(|(unit_price, quantity)| line_total(unit_price, quantity))
        .sum()
}

/// Order total: subtotal plus the flat delivery fee.
#[must_use]
pub fn order_total(subtotal: Decimal, delivery_fee: Decimal) -> Decimal {
    subtotal + delivery_fee
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_no_discount_leaves_price_unchanged() {
        assert_eq!(effective_price(dec!(15.00), dec!(0)), dec!(15.00));
        assert_eq!(effective_price(dec!(0.01), dec!(0)), dec!(0.01));
    }

    #[test]
    fn test_full_discount_is_free() {
        assert_eq!(effective_price(dec!(15.00), dec!(100)), dec!(0.00));
        assert_eq!(effective_price(dec!(999.99), dec!(100)), dec!(0.00));
    }

    #[test]
    fn test_plain_discount() {
        // 10% off 20.00
        assert_eq!(effective_price(dec!(20.00), dec!(10)), dec!(18.00));
        // 25% off 10.00
        assert_eq!(effective_price(dec!(10.00), dec!(25)), dec!(7.50));
    }

    #[test]
    fn test_rounding_is_half_up() {
        // 10.05 * 0.5 = 5.025 -> 5.03 (half-up), banker's would give 5.02
        assert_eq!(effective_price(dec!(10.05), dec!(50)), dec!(5.03));
        // 10.15 * 0.5 = 5.075 -> 5.08
        assert_eq!(effective_price(dec!(10.15), dec!(50)), dec!(5.08));
        // 9.99 * (1 - 0.33) = 6.6933 -> 6.69
        assert_eq!(effective_price(dec!(9.99), dec!(33)), dec!(6.69));
    }

    #[test]
    fn test_fractional_discount_percentage() {
        // 12.5% off 80.00 = 70.00
        assert_eq!(effective_price(dec!(80.00), dec!(12.50)), dec!(70.00));
        // 33.33% off 100.00 = 66.67
        assert_eq!(effective_price(dec!(100.00), dec!(33.33)), dec!(66.67));
    }

    #[test]
    fn test_zero_price() {
        assert_eq!(effective_price(dec!(0.00), dec!(50)), dec!(0.00));
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(dec!(7.50), 3), dec!(22.50));
        assert_eq!(line_total(dec!(7.50), 0), dec!(0.00));
    }

    #[test]
    fn test_subtotal_and_total() {
        let items = [(dec!(15.00), 2), (dec!(3.25), 4)];
        let sub = subtotal(items);
        assert_eq!(sub, dec!(43.00));
        assert_eq!(order_total(sub, dec!(5.00)), dec!(48.00));
    }

    #[test]
    fn test_subtotal_empty_is_zero() {
        assert_eq!(subtotal(std::iter::empty()), Decimal::ZERO);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let items = [(dec!(9.99), 1), (dec!(0.01), 100)];
        let first = subtotal(items);
        let second = subtotal(items);
        assert_eq!(first, second);
        assert_eq!(order_total(first, dec!(2.50)), order_total(second, dec!(2.50)));
    }
}
