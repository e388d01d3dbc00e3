use std::cmp::Ordering;
use std::fmt;

use blockexec_error::{BlockexecError, Result};

use crate::arrays::datatype::DataType;

/// A single dynamically typed scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Null,

    /// True or false value.
    Boolean(bool),

    /// Signed 32bit int.
    Int32(i32),

    /// Signed 64bit int.
    Int64(i64),

    /// 64bit float.
    Float64(f64),

    /// Utf-8 encoded string.
    Utf8(String),
}

impl ScalarValue {
    pub fn datatype(&self) -> DataType {
        match self {
            ScalarValue::Null => DataType::Null,
            ScalarValue::Boolean(_) => DataType::Boolean,
            ScalarValue::Int32(_) => DataType::Int32,
            ScalarValue::Int64(_) => DataType::Int64,
            ScalarValue::Float64(_) => DataType::Float64,
            ScalarValue::Utf8(_) => DataType::Utf8,
        }
    }

    /// Canonical representation used for group key equality and hashing.
    ///
    /// Numeric values that represent the same number normalize to the same
    /// form regardless of their physical type, so `2_i32`, `2_i64` and
    /// `2.0_f64` all land in the same group.
    pub(crate) fn normalized(&self) -> NormalizedValue<'_> {
        match self {
            ScalarValue::Null => NormalizedValue::Null,
            ScalarValue::Boolean(v) => NormalizedValue::Boolean(*v),
            ScalarValue::Int32(v) => NormalizedValue::Int(*v as i64),
            ScalarValue::Int64(v) => NormalizedValue::Int(*v),
            ScalarValue::Float64(v) => {
                // i64 range bound chosen such that the cast is lossless.
                if v.fract() == 0.0 && *v >= -(2f64.powi(63)) && *v < 2f64.powi(63) {
                    NormalizedValue::Int(*v as i64)
                } else if v.is_nan() {
                    // All NaN payloads group together.
                    NormalizedValue::Float(f64::NAN.to_bits())
                } else {
                    NormalizedValue::Float(v.to_bits())
                }
            }
            ScalarValue::Utf8(v) => NormalizedValue::Utf8(v),
        }
    }

    /// Compare two values within a comparable class.
    ///
    /// Numerics compare numerically across physical types. Comparing values
    /// from different classes is a type error.
    pub fn try_cmp(&self, other: &ScalarValue) -> Result<Ordering> {
        use ScalarValue as S;

        Ok(match (self, other) {
            (S::Null, S::Null) => Ordering::Equal,
            (S::Boolean(a), S::Boolean(b)) => a.cmp(b),
            (S::Int32(a), S::Int32(b)) => a.cmp(b),
            (S::Int64(a), S::Int64(b)) => a.cmp(b),
            (S::Int32(a), S::Int64(b)) => (*a as i64).cmp(b),
            (S::Int64(a), S::Int32(b)) => a.cmp(&(*b as i64)),
            (S::Utf8(a), S::Utf8(b)) => a.cmp(b),
            (a, b) if a.datatype().is_numeric() && b.datatype().is_numeric() => {
                // At least one side is a float.
                a.as_f64()?.total_cmp(&b.as_f64()?)
            }
            (a, b) => {
                return Err(BlockexecError::new("Cannot compare values")
                    .with_field("left", a.datatype())
                    .with_field("right", b.datatype()))
            }
        })
    }

    pub(crate) fn as_f64(&self) -> Result<f64> {
        match self {
            ScalarValue::Int32(v) => Ok(*v as f64),
            ScalarValue::Int64(v) => Ok(*v as f64),
            ScalarValue::Float64(v) => Ok(*v),
            other => Err(BlockexecError::new("Value is not numeric")
                .with_field("type", other.datatype())),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Null => write!(f, "NULL"),
            ScalarValue::Boolean(v) => write!(f, "{v}"),
            ScalarValue::Int32(v) => write!(f, "{v}"),
            ScalarValue::Int64(v) => write!(f, "{v}"),
            ScalarValue::Float64(v) => write!(f, "{v}"),
            ScalarValue::Utf8(v) => write!(f, "{v}"),
        }
    }
}

/// Borrowed canonical form of a scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum NormalizedValue<'a> {
    Null,
    Boolean(bool),
    Int(i64),
    /// Bit pattern of floats with no exact integer representation.
    Float(u64),
    Utf8(&'a str),
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Boolean(value)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        ScalarValue::Int32(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int64(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float64(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Utf8(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Utf8(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_normalization_bridges_types() {
        assert_eq!(
            ScalarValue::Int32(2).normalized(),
            ScalarValue::Int64(2).normalized(),
        );
        assert_eq!(
            ScalarValue::Int32(2).normalized(),
            ScalarValue::Float64(2.0).normalized(),
        );
        assert_ne!(
            ScalarValue::Float64(2.5).normalized(),
            ScalarValue::Int64(2).normalized(),
        );
    }

    #[test]
    fn nan_normalizes_to_single_form() {
        let a = ScalarValue::Float64(f64::NAN);
        let b = ScalarValue::Float64(-f64::NAN);
        assert_eq!(a.normalized(), b.normalized());
    }

    #[test]
    fn cmp_across_numeric_types() {
        assert_eq!(
            Ordering::Less,
            ScalarValue::Int32(3).try_cmp(&ScalarValue::Int64(4)).unwrap()
        );
        assert_eq!(
            Ordering::Greater,
            ScalarValue::Float64(4.5)
                .try_cmp(&ScalarValue::Int32(4))
                .unwrap()
        );
        assert_eq!(
            Ordering::Equal,
            ScalarValue::Int64(10)
                .try_cmp(&ScalarValue::Float64(10.0))
                .unwrap()
        );
    }

    #[test]
    fn cmp_cross_class_errors() {
        ScalarValue::Int32(1)
            .try_cmp(&ScalarValue::Utf8("a".to_string()))
            .unwrap_err();
        ScalarValue::Boolean(true)
            .try_cmp(&ScalarValue::Int64(1))
            .unwrap_err();
    }
}
