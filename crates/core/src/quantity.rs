//! Quantity value object.
//!
//! Stock units can be fractional (weighed goods, cut material), so all
//! availability arithmetic runs on an exact decimal type. Comparisons use the
//! decimal's native ordering, never float coercion.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An exact decimal quantity.
///
/// Non-negative by convention after normalization: subtraction that would go
/// below zero is clamped by [`Quantity::saturating_sub`]. Intermediate values
/// (e.g. a raw physical-minus-reserved difference) are normalized before they
/// leave the calculator.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
    pub const ZERO: Quantity = Quantity(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub const fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn add(self, other: Quantity) -> Quantity {
        Quantity(self.0 + other.0)
    }

    /// Subtracts `other`, flooring the result at zero.
    ///
    /// Over-reservation (reserved exceeding physical stock) must never
    /// surface as a negative availability.
    pub fn saturating_sub(self, other: Quantity) -> Quantity {
        let difference = self.0 - other.0;
        if difference.is_sign_negative() {
            Quantity(Decimal::ZERO)
        } else {
            Quantity(difference)
        }
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Decimal> for Quantity {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<u32> for Quantity {
    fn from(value: u32) -> Self {
        Self(Decimal::from(value))
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl core::iter::Sum for Quantity {
    fn sum<I: Iterator<Item = Quantity>>(iter: I) -> Self {
        iter.fold(Quantity::ZERO, Quantity::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn saturating_sub_floors_at_zero() {
        let physical = Quantity::from(3u32);
        let reserved = Quantity::from(5u32);
        assert_eq!(physical.saturating_sub(reserved), Quantity::ZERO);
    }

    #[test]
    fn saturating_sub_keeps_positive_difference() {
        let physical = Quantity::new(dec!(5.5));
        let reserved = Quantity::new(dec!(2));
        assert_eq!(physical.saturating_sub(reserved), Quantity::new(dec!(3.5)));
    }

    #[test]
    fn fractional_quantities_compare_exactly() {
        // 0.1 + 0.2 is exactly 0.3 in decimal, unlike binary floats.
        let sum = Quantity::new(dec!(0.1)).add(Quantity::new(dec!(0.2)));
        assert_eq!(sum, Quantity::new(dec!(0.3)));
        assert!(sum.is_positive());
    }

    #[test]
    fn zero_is_not_positive() {
        assert!(Quantity::ZERO.is_zero());
        assert!(!Quantity::ZERO.is_positive());
    }

    #[test]
    fn sum_over_iterator() {
        let total: Quantity = [dec!(1), dec!(2.5), dec!(0.5)]
            .into_iter()
            .map(Quantity::new)
            .sum();
        assert_eq!(total, Quantity::new(dec!(4)));
    }
}
