//! Exact rational numbers for money-adjacent rates.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use thiserror::Error;

/// Errors from rational rate arithmetic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateError {
    /// Denominator must be a positive integer.
    #[error("denominator must be positive, got {0}")]
    InvalidDenominator(i64),

    /// The reduced result no longer fits in 64 bits.
    #[error("rational arithmetic overflow")]
    Overflow,
}

/// An exact fraction `num / denom` with a positive denominator.
///
/// Addition cross-multiplies in 128-bit intermediates and reduces by
/// gcd, so sums of tax components never lose precision. Conversion to
/// decimal happens only at the presentation boundary.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Rational {
    num: i64,
    denom: i64,
}

impl Rational {
    /// Zero, canonically 0/1.
    pub const ZERO: Self = Self { num: 0, denom: 1 };

    /// Creates a rational, validating the denominator.
    ///
    /// # Errors
    ///
    /// Returns `RateError::InvalidDenominator` if `denom <= 0`.
    pub const fn new(num: i64, denom: i64) -> Result<Self, RateError> {
        if denom <= 0 {
            return Err(RateError::InvalidDenominator(denom));
        }
        Ok(Self { num, denom })
    }

    /// Returns the numerator.
    #[must_use]
    pub const fn numerator(self) -> i64 {
        self.num
    }

    /// Returns the denominator (always positive).
    #[must_use]
    pub const fn denominator(self) -> i64 {
        self.denom
    }

    /// Adds two rationals exactly.
    ///
    /// # Errors
    ///
    /// Returns `RateError::Overflow` if the gcd-reduced sum does not
    /// fit in `i64`.
    pub fn checked_add(self, other: Self) -> Result<Self, RateError> {
        let num = i128::from(self.num) * i128::from(other.denom)
            + i128::from(other.num) * i128::from(self.denom);
        let denom = i128::from(self.denom) * i128::from(other.denom);

        // denom > 0 on both sides, so the gcd is at least 1.
        let g = i128::try_from(gcd(num.unsigned_abs(), denom.unsigned_abs()))
            .map_err(|_| RateError::Overflow)?;
        let num = num / g;
        let denom = denom / g;

        Ok(Self {
            num: i64::try_from(num).map_err(|_| RateError::Overflow)?,
            denom: i64::try_from(denom).map_err(|_| RateError::Overflow)?,
        })
    }

    /// Converts to a decimal rounded half-up to `scale` places.
    ///
    /// Presentation only - comparisons and sums must stay rational.
    #[must_use]
    pub fn to_decimal(self, scale: u32) -> Decimal {
        (Decimal::from(self.num) / Decimal::from(self.denom))
            .round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Converts to a percentage decimal rounded half-up to `scale` places.
    #[must_use]
    pub fn to_percent(self, scale: u32) -> Decimal {
        (Decimal::from(self.num) * Decimal::ONE_HUNDRED / Decimal::from(self.denom))
            .round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl PartialEq for Rational {
    /// Equality by cross-multiplication: 15/100 == 3/20.
    fn eq(&self, other: &Self) -> bool {
        i128::from(self.num) * i128::from(other.denom)
            == i128::from(other.num) * i128::from(self.denom)
    }
}

impl Eq for Rational {}

impl std::fmt::Display for Rational {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.num, self.denom)
    }
}

/// Euclidean gcd on magnitudes.
const fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_rejects_non_positive_denominator() {
        assert_eq!(
            Rational::new(1, 0),
            Err(RateError::InvalidDenominator(0))
        );
        assert_eq!(
            Rational::new(1, -100),
            Err(RateError::InvalidDenominator(-100))
        );
    }

    #[test]
    fn test_add_reduces() {
        let sum = Rational::new(10, 100)
            .unwrap()
            .checked_add(Rational::new(5, 100).unwrap())
            .unwrap();

        // Reduced form is 3/20 but equality is cross-multiplied.
        assert_eq!(sum, Rational::new(15, 100).unwrap());
        assert_eq!(sum.numerator(), 3);
        assert_eq!(sum.denominator(), 20);
    }

    #[test]
    fn test_equality_cross_multiplied() {
        assert_eq!(Rational::new(15, 100).unwrap(), Rational::new(3, 20).unwrap());
        assert_eq!(Rational::new(0, 7).unwrap(), Rational::ZERO);
        assert_ne!(Rational::new(1, 3).unwrap(), Rational::new(1, 4).unwrap());
    }

    #[test]
    fn test_to_decimal_rounds_half_up() {
        // 1/8 = 0.125 -> 0.13 at two places under round-half-up.
        assert_eq!(Rational::new(1, 8).unwrap().to_decimal(2), dec!(0.13));
        assert_eq!(Rational::new(1, 8).unwrap().to_decimal(3), dec!(0.125));
    }

    #[test]
    fn test_to_percent() {
        assert_eq!(Rational::new(15, 100).unwrap().to_percent(2), dec!(15.00));
        assert_eq!(Rational::new(3, 8).unwrap().to_percent(2), dec!(37.50));
    }

    #[test]
    fn test_display() {
        assert_eq!(Rational::new(3, 8).unwrap().to_string(), "3/8");
    }

    #[test]
    fn test_negative_numerator_allowed() {
        // Adjustment components can be negative.
        let sum = Rational::new(10, 100)
            .unwrap()
            .checked_add(Rational::new(-2, 100).unwrap())
            .unwrap();
        assert_eq!(sum, Rational::new(8, 100).unwrap());
    }

    #[test]
    fn test_overflow_detected() {
        let big = Rational::new(i64::MAX, 1).unwrap();
        assert_eq!(big.checked_add(big), Err(RateError::Overflow));
    }
}

/// Property-based tests for rational exactness.
#[cfg(test)]
mod props {
    use super::*;
    use proptest::prelude::*;

    fn rational_strategy() -> impl Strategy<Value = Rational> {
        (-10_000i64..=10_000, 1i64..=10_000)
            .prop_map(|(num, denom)| Rational::new(num, denom).unwrap())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Addition is commutative.
        #[test]
        fn prop_add_commutative(a in rational_strategy(), b in rational_strategy()) {
            prop_assert_eq!(a.checked_add(b).unwrap(), b.checked_add(a).unwrap());
        }

        /// Addition is associative.
        #[test]
        fn prop_add_associative(
            a in rational_strategy(),
            b in rational_strategy(),
            c in rational_strategy(),
        ) {
            let left = a.checked_add(b).unwrap().checked_add(c).unwrap();
            let right = a.checked_add(b.checked_add(c).unwrap()).unwrap();
            prop_assert_eq!(left, right);
        }

        /// Zero is the additive identity.
        #[test]
        fn prop_zero_identity(a in rational_strategy()) {
            prop_assert_eq!(a.checked_add(Rational::ZERO).unwrap(), a);
        }

        /// The sum equals the cross-multiplied textbook result.
        #[test]
        fn prop_sum_is_exact(a in rational_strategy(), b in rational_strategy()) {
            let sum = a.checked_add(b).unwrap();
            let expected_num = i128::from(a.numerator()) * i128::from(b.denominator())
                + i128::from(b.numerator()) * i128::from(a.denominator());
            let expected_denom = i128::from(a.denominator()) * i128::from(b.denominator());
            // sum == expected exactly, compared by cross-multiplication.
            prop_assert_eq!(
                i128::from(sum.numerator()) * expected_denom,
                expected_num * i128::from(sum.denominator())
            );
        }

        /// Denominators stay positive through reduction.
        #[test]
        fn prop_denominator_stays_positive(a in rational_strategy(), b in rational_strategy()) {
            prop_assert!(a.checked_add(b).unwrap().denominator() > 0);
        }
    }
}
