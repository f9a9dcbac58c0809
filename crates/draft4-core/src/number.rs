//! # Numeric Normalization
//!
//! Converts heterogeneous numeric representations into one of two
//! canonical, comparable forms:
//!
//! - [`Numeric::Integer`]: an exact `i64`.
//! - [`Numeric::Float`]: a finite `f64`.
//!
//! The split follows the decoder: `serde_json` keeps integer literals
//! (`5`) in an integer slot and anything written with a fraction or an
//! exponent (`5.0`, `5e0`) in a float slot, so the literal form of a schema
//! number survives into the canonical form.
//!
//! Values with no safe mapping (an unsigned value above `i64::MAX`, NaN,
//! infinities) are rejected with [`TypeError`]. Callers that must stay total
//! (the evaluator) use [`Numeric::from_number_lossy`] instead.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::error::TypeError;

/// A number in canonical comparable form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    /// Exact integer.
    Integer(i64),
    /// Finite floating value.
    Float(f64),
}

impl Numeric {
    /// Normalize a decoded JSON number.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::UnsignedOverflow`] for integers above `i64::MAX`
    /// and [`TypeError::NonFinite`] / [`TypeError::Unrepresentable`] when no
    /// float form exists.
    pub fn from_number(n: &Number) -> Result<Self, TypeError> {
        if let Some(i) = n.as_i64() {
            return Ok(Self::Integer(i));
        }
        if let Some(u) = n.as_u64() {
            return Err(TypeError::UnsignedOverflow(u));
        }
        match n.as_f64() {
            Some(f) if f.is_finite() => Ok(Self::Float(f)),
            Some(f) => Err(TypeError::NonFinite(f)),
            None => Err(TypeError::Unrepresentable(n.to_string())),
        }
    }

    /// Like [`Numeric::from_number`], but falls back to the float form when
    /// no exact mapping exists. Returns `None` only when not even a finite
    /// float can be produced.
    pub fn from_number_lossy(n: &Number) -> Option<Self> {
        match Self::from_number(n) {
            Ok(v) => Some(v),
            Err(_) => n.as_f64().filter(|f| f.is_finite()).map(Self::Float),
        }
    }

    /// The value as `f64` (lossy for integers beyond 2^53).
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Integer(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    /// Returns true for the exact integer form.
    pub fn is_integer(self) -> bool {
        matches!(self, Self::Integer(_))
    }

    /// Order two numbers. Integers compare exactly; any float involvement
    /// compares in `f64`.
    pub fn compare(self, other: Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }

    /// Divisibility test, defined only when both sides are exact integers
    /// and the divisor is non-zero. Returns `None` otherwise.
    pub fn is_multiple_of(self, divisor: Self) -> Option<bool> {
        match (self, divisor) {
            (Self::Integer(_), Self::Integer(0)) => None,
            // i64::MIN % -1 overflows; it is a multiple.
            (Self::Integer(a), Self::Integer(d)) => Some(a.checked_rem(d).map_or(true, |r| r == 0)),
            _ => None,
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
        }
    }
}

macro_rules! exact_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Numeric {
                fn from(v: $t) -> Self {
                    Self::Integer(i64::from(v))
                }
            }
        )*
    };
}

exact_from!(i8, i16, i32, i64, u8, u16, u32);

impl TryFrom<u64> for Numeric {
    type Error = TypeError;

    fn try_from(v: u64) -> Result<Self, Self::Error> {
        i64::try_from(v)
            .map(Self::Integer)
            .map_err(|_| TypeError::UnsignedOverflow(v))
    }
}

impl TryFrom<usize> for Numeric {
    type Error = TypeError;

    fn try_from(v: usize) -> Result<Self, Self::Error> {
        Self::try_from(v as u64)
    }
}

impl TryFrom<f64> for Numeric {
    type Error = TypeError;

    fn try_from(v: f64) -> Result<Self, Self::Error> {
        if v.is_finite() {
            Ok(Self::Float(v))
        } else {
            Err(TypeError::NonFinite(v))
        }
    }
}

impl TryFrom<f32> for Numeric {
    type Error = TypeError;

    fn try_from(v: f32) -> Result<Self, Self::Error> {
        Self::try_from(f64::from(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn number(v: serde_json::Value) -> Number {
        match v {
            serde_json::Value::Number(n) => n,
            other => panic!("not a number: {other}"),
        }
    }

    #[test]
    fn integer_literal_stays_exact() {
        assert_eq!(Numeric::from_number(&number(json!(5))).unwrap(), Numeric::Integer(5));
        assert_eq!(Numeric::from_number(&number(json!(-3))).unwrap(), Numeric::Integer(-3));
    }

    #[test]
    fn fractional_literal_is_float() {
        let n: Number = serde_json::from_str("5.0").unwrap();
        assert_eq!(Numeric::from_number(&n).unwrap(), Numeric::Float(5.0));
    }

    #[test]
    fn large_unsigned_is_rejected() {
        let err = Numeric::from_number(&number(json!(u64::MAX))).unwrap_err();
        assert_eq!(err, TypeError::UnsignedOverflow(u64::MAX));
        assert!(Numeric::try_from(u64::MAX).is_err());
    }

    #[test]
    fn lossy_falls_back_to_float() {
        let v = Numeric::from_number_lossy(&number(json!(u64::MAX))).unwrap();
        assert!(matches!(v, Numeric::Float(_)));
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        assert!(Numeric::try_from(f64::NAN).is_err());
        assert!(Numeric::try_from(f32::INFINITY).is_err());
    }

    #[test]
    fn compare_mixed_forms() {
        assert_eq!(
            Numeric::Integer(1).compare(Numeric::Float(1.0)),
            Some(Ordering::Equal)
        );
        assert_eq!(
            Numeric::Integer(0).compare(Numeric::Float(0.0001)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Numeric::Integer(i64::MAX).compare(Numeric::Integer(i64::MAX - 1)),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn multiple_of_only_for_integers() {
        assert_eq!(Numeric::Integer(10).is_multiple_of(Numeric::Integer(2)), Some(true));
        assert_eq!(Numeric::Integer(7).is_multiple_of(Numeric::Integer(2)), Some(false));
        assert_eq!(Numeric::Float(7.5).is_multiple_of(Numeric::Integer(2)), None);
        assert_eq!(Numeric::Integer(7).is_multiple_of(Numeric::Integer(0)), None);
        assert_eq!(
            Numeric::Integer(i64::MIN).is_multiple_of(Numeric::Integer(-1)),
            Some(true)
        );
    }

    #[test]
    fn heterogeneous_integers_normalize() {
        assert_eq!(Numeric::from(7u8), Numeric::Integer(7));
        assert_eq!(Numeric::from(-7i16), Numeric::Integer(-7));
        assert_eq!(Numeric::try_from(7usize).unwrap(), Numeric::Integer(7));
        assert_eq!(Numeric::try_from(1.5f32).unwrap(), Numeric::Float(1.5));
    }
}
