use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};
use thiserror::Error as ThisError;

///
/// NumericError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum NumericError {
    #[error("zero denominator")]
    ZeroDenominator,
}

///
/// Numeric
///
/// Exact rational amount (numerator over denominator).
///
/// Invariant:
/// - denominator is always positive; the numerator carries the sign
/// - equality and ordering are value-based (1/2 == 2/4)
///

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Numeric {
    num: i64,
    denom: i64,
}

impl Numeric {
    pub const ZERO: Self = Self { num: 0, denom: 1 };

    /// Construct a rational; a zero denominator is rejected, a negative
    /// denominator moves the sign onto the numerator.
    pub const fn new(num: i64, denom: i64) -> Result<Self, NumericError> {
        if denom == 0 {
            return Err(NumericError::ZeroDenominator);
        }

        if denom < 0 {
            Ok(Self {
                num: num.wrapping_neg(),
                denom: denom.wrapping_neg(),
            })
        } else {
            Ok(Self { num, denom })
        }
    }

    /// Internal constructor; the caller guarantees `denom > 0`.
    pub(crate) const fn from_raw(num: i64, denom: i64) -> Self {
        Self { num, denom }
    }

    #[must_use]
    pub const fn from_int(num: i64) -> Self {
        Self { num, denom: 1 }
    }

    #[must_use]
    pub const fn num(&self) -> i64 {
        self.num
    }

    #[must_use]
    pub const fn denom(&self) -> i64 {
        self.denom
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.num == 0
    }

    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.num < 0
    }

    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.num > 0
    }

    #[must_use]
    pub const fn abs(self) -> Self {
        Self {
            num: self.num.saturating_abs(),
            denom: self.denom,
        }
    }

    #[must_use]
    pub const fn neg(self) -> Self {
        Self {
            num: self.num.saturating_neg(),
            denom: self.denom,
        }
    }

    /// Exact difference, reduced to lowest terms.
    ///
    /// Returns `None` when the reduced result does not fit in i64.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        let num = i128::from(self.num) * i128::from(other.denom)
            - i128::from(other.num) * i128::from(self.denom);
        let denom = i128::from(self.denom) * i128::from(other.denom);

        Self::reduce(num, denom)
    }

    fn reduce(num: i128, denom: i128) -> Option<Self> {
        let divisor = gcd(num.unsigned_abs(), denom.unsigned_abs());
        let num = i64::try_from(num / i128::try_from(divisor).ok()?).ok()?;
        let denom = i64::try_from(denom / i128::try_from(divisor).ok()?).ok()?;

        Some(Self { num, denom })
    }
}

const fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let rem = a % b;
        a = b;
        b = rem;
    }
    a
}

// Value comparison by i128 cross-multiplication; denominators are positive
// so no sign flip is needed.
impl Ord for Numeric {
    fn cmp(&self, other: &Self) -> Ordering {
        let left = i128::from(self.num) * i128::from(other.denom);
        let right = i128::from(other.num) * i128::from(self.denom);

        left.cmp(&right)
    }
}

impl PartialOrd for Numeric {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Numeric {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Numeric {}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.denom)
    }
}

impl From<i64> for Numeric {
    fn from(num: i64) -> Self {
        Self::from_int(num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn normalizes_negative_denominator() {
        let n = Numeric::new(3, -4).unwrap();
        assert_eq!(n.num(), -3);
        assert_eq!(n.denom(), 4);
        assert!(n.is_negative());
    }

    #[test]
    fn rejects_zero_denominator() {
        assert_eq!(Numeric::new(1, 0), Err(NumericError::ZeroDenominator));
    }

    #[test]
    fn value_equality_ignores_representation() {
        assert_eq!(Numeric::new(1, 2).unwrap(), Numeric::new(2, 4).unwrap());
        assert!(Numeric::new(1, 3).unwrap() < Numeric::new(1, 2).unwrap());
    }

    #[test]
    fn subtraction_reduces() {
        let a = Numeric::new(3, 4).unwrap();
        let b = Numeric::new(1, 4).unwrap();
        assert_eq!(a.checked_sub(b).unwrap(), Numeric::new(1, 2).unwrap());
    }

    #[test]
    fn negation_and_magnitude() {
        let a = Numeric::new(3, 4).unwrap();
        assert_eq!(a.neg(), Numeric::new(-3, 4).unwrap());
        assert_eq!(a.neg().abs(), a);
        assert_eq!(a.to_string(), "3/4");
    }

    proptest! {
        #[test]
        fn ordering_agrees_with_subtraction_sign(
            an in -1_000_000i64..1_000_000,
            ad in 1i64..10_000,
            bn in -1_000_000i64..1_000_000,
            bd in 1i64..10_000,
        ) {
            let a = Numeric::new(an, ad).unwrap();
            let b = Numeric::new(bn, bd).unwrap();
            let diff = a.checked_sub(b).unwrap();

            let expected = match a.cmp(&b) {
                Ordering::Less => diff.is_negative(),
                Ordering::Equal => diff.is_zero(),
                Ordering::Greater => diff.is_positive(),
            };
            prop_assert!(expected);
        }

        #[test]
        fn ordering_is_antisymmetric(
            an in -1_000_000i64..1_000_000,
            ad in 1i64..10_000,
            bn in -1_000_000i64..1_000_000,
            bd in 1i64..10_000,
        ) {
            let a = Numeric::new(an, ad).unwrap();
            let b = Numeric::new(bn, bd).unwrap();
            prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        }
    }
}
