//! Exact tax rate arithmetic.
//!
//! Tax tables combine several components (e.g. state + local) whose
//! rates are stored as integer fractions. The combined rate is the
//! exact sum of the component fractions - never an accumulation of
//! floating-point divisions, which drifts for non-terminating binary
//! fractions (1/8 + 1/4 must be exactly 3/8, not 0.37499999...).

mod rational;

pub use rational::{RateError, Rational};

/// Sums tax components into one exact rational rate.
///
/// Components are additive (stacked multi-jurisdiction model). The
/// caller supplies them in presentation order; addition is order
/// independent anyway.
///
/// # Errors
///
/// Returns `RateError::Overflow` if the reduced sum no longer fits the
/// underlying integer representation.
pub fn total_rate<I>(components: I) -> Result<Rational, RateError>
where
    I: IntoIterator<Item = Rational>,
{
    components
        .into_iter()
        .try_fold(Rational::ZERO, Rational::checked_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_state_plus_local() {
        let total = total_rate([
            Rational::new(10, 100).unwrap(),
            Rational::new(5, 100).unwrap(),
        ])
        .unwrap();

        assert_eq!(total, Rational::new(15, 100).unwrap());
        assert_eq!(total.to_decimal(2), dec!(0.15));
    }

    #[test]
    fn test_binary_fractions_stay_exact() {
        let total = total_rate([
            Rational::new(1, 8).unwrap(),
            Rational::new(1, 4).unwrap(),
        ])
        .unwrap();

        assert_eq!(total, Rational::new(3, 8).unwrap());
        assert_eq!(total.to_decimal(3), dec!(0.375));
    }

    #[test]
    fn test_empty_table_is_zero() {
        let total = total_rate([]).unwrap();
        assert_eq!(total, Rational::ZERO);
        assert_eq!(total.to_decimal(2), dec!(0.00));
    }

    #[test]
    fn test_many_components() {
        // 1/100 ten times is exactly 10/100.
        let total = total_rate((0..10).map(|_| Rational::new(1, 100).unwrap())).unwrap();
        assert_eq!(total, Rational::new(10, 100).unwrap());
    }

    #[test]
    fn test_percent_presentation() {
        let total = total_rate([
            Rational::new(1, 8).unwrap(),
            Rational::new(1, 4).unwrap(),
        ])
        .unwrap();

        // 3/8 = 37.5%; round-half-up to two places.
        assert_eq!(total.to_percent(2), dec!(37.50));
    }
}
