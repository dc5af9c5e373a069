//! Typed values returned by and accepted for message keys.

use std::fmt;

use ndarray::{Array1, Array2, ArrayD};
use serde::{Deserialize, Serialize};

use crate::masked::MaskedArray;

/// Memory order in which a key's array elements are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StorageOrder {
    /// Consecutive elements run along a row (i varies fastest).
    #[default]
    RowMajor,
    /// Consecutive elements run down a column (j varies fastest).
    ColumnMajor,
}

/// The value of one message key.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyValue {
    Long(i64),
    Double(f64),
    Text(String),
    LongArray(Array1<i64>),
    DoubleArray(Array1<f64>),
    /// The data field, shaped and masked.
    Field(MaskedArray),
}

impl KeyValue {
    pub fn as_long(&self) -> Option<i64> {
        match self {
            KeyValue::Long(v) => Some(*v),
            KeyValue::Double(v) => Some(*v as i64),
            KeyValue::LongArray(a) if a.len() == 1 => Some(a[0]),
            KeyValue::DoubleArray(a) if a.len() == 1 => Some(a[0] as i64),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            KeyValue::Long(v) => Some(*v as f64),
            KeyValue::Double(v) => Some(*v),
            KeyValue::LongArray(a) if a.len() == 1 => Some(a[0] as f64),
            KeyValue::DoubleArray(a) if a.len() == 1 => Some(a[0]),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            KeyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric content as a flat `f64` vector, scalars included.
    pub fn to_f64_vec(&self) -> Option<Vec<f64>> {
        match self {
            KeyValue::Long(v) => Some(vec![*v as f64]),
            KeyValue::Double(v) => Some(vec![*v]),
            KeyValue::LongArray(a) => Some(a.iter().map(|v| *v as f64).collect()),
            KeyValue::DoubleArray(a) => Some(a.to_vec()),
            KeyValue::Field(m) => Some(m.data().iter().copied().collect()),
            KeyValue::Text(_) => None,
        }
    }

    /// Numeric content as a flat `i64` vector, scalars included.
    pub fn to_i64_vec(&self) -> Option<Vec<i64>> {
        match self {
            KeyValue::Long(v) => Some(vec![*v]),
            KeyValue::Double(v) => Some(vec![*v as i64]),
            KeyValue::LongArray(a) => Some(a.to_vec()),
            KeyValue::DoubleArray(a) => Some(a.iter().map(|v| *v as i64).collect()),
            KeyValue::Field(m) => Some(m.data().iter().map(|v| *v as i64).collect()),
            KeyValue::Text(_) => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, KeyValue::Text(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            KeyValue::Long(_) => "long",
            KeyValue::Double(_) => "double",
            KeyValue::Text(_) => "text",
            KeyValue::LongArray(_) => "long array",
            KeyValue::DoubleArray(_) => "double array",
            KeyValue::Field(_) => "field",
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Long(v) => write!(f, "{}", v),
            KeyValue::Double(v) => write!(f, "{}", v),
            KeyValue::Text(s) => f.write_str(s),
            KeyValue::LongArray(a) => write!(f, "{}", a),
            KeyValue::DoubleArray(a) => write!(f, "{}", a),
            KeyValue::Field(m) => write!(f, "{}", m.data()),
        }
    }
}

impl From<i64> for KeyValue {
    fn from(v: i64) -> Self {
        KeyValue::Long(v)
    }
}

impl From<i32> for KeyValue {
    fn from(v: i32) -> Self {
        KeyValue::Long(v as i64)
    }
}

impl From<f64> for KeyValue {
    fn from(v: f64) -> Self {
        KeyValue::Double(v)
    }
}

impl From<&str> for KeyValue {
    fn from(v: &str) -> Self {
        KeyValue::Text(v.to_string())
    }
}

impl From<String> for KeyValue {
    fn from(v: String) -> Self {
        KeyValue::Text(v)
    }
}

impl From<Vec<i64>> for KeyValue {
    fn from(v: Vec<i64>) -> Self {
        KeyValue::LongArray(Array1::from(v))
    }
}

impl From<Vec<f64>> for KeyValue {
    fn from(v: Vec<f64>) -> Self {
        KeyValue::DoubleArray(Array1::from(v))
    }
}

impl From<Array1<i64>> for KeyValue {
    fn from(v: Array1<i64>) -> Self {
        KeyValue::LongArray(v)
    }
}

impl From<Array1<f64>> for KeyValue {
    fn from(v: Array1<f64>) -> Self {
        KeyValue::DoubleArray(v)
    }
}

impl From<Array2<f64>> for KeyValue {
    fn from(v: Array2<f64>) -> Self {
        KeyValue::Field(MaskedArray::new(v.into_dyn()))
    }
}

impl From<ArrayD<f64>> for KeyValue {
    fn from(v: ArrayD<f64>) -> Self {
        KeyValue::Field(MaskedArray::new(v))
    }
}

impl From<MaskedArray> for KeyValue {
    fn from(v: MaskedArray) -> Self {
        KeyValue::Field(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_scalar_casts() {
        assert_eq!(KeyValue::Double(7.9).as_long(), Some(7));
        assert_eq!(KeyValue::Long(3).as_double(), Some(3.0));
        assert_eq!(KeyValue::from(vec![5i64]).as_long(), Some(5));
        assert_eq!(KeyValue::from("x").as_long(), None);
        assert_eq!(KeyValue::from(vec![1.0, 2.0]).as_double(), None);
    }

    #[test]
    fn test_flatten_field() {
        let value = KeyValue::from(array![[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(value.kind(), "field");
        assert_eq!(value.to_f64_vec(), Some(vec![1.0, 2.0, 3.0, 4.0]));
        assert_eq!(KeyValue::from("text").to_f64_vec(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(KeyValue::from("regular_ll").to_string(), "regular_ll");
        assert_eq!(KeyValue::Long(94).to_string(), "94");
    }
}
