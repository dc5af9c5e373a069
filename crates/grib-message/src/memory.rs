//! In-memory implementation of the decoder boundary.
//!
//! [`MemoryDecoder`] keeps an ordered key table and answers the same
//! questions a byte-level decoder would. It is used for pre-decoded data and
//! as the decoder behind synthetic test messages. Every setter call is
//! counted, successful or not, so callers can check that a rejected write
//! never reached the decoder.

use std::collections::{HashMap, HashSet};

use bytes::Bytes;

use crate::decoder::{
    Decoder, DecoderError, DecoderResult, KeyFilter, NativeType, MISSING_DOUBLE, MISSING_LONG,
};

/// A value held by a [`MemoryDecoder`] key.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    Long(i64),
    Double(f64),
    Text(String),
    LongArray(Vec<i64>),
    DoubleArray(Vec<f64>),
    Bytes(Vec<u8>),
    /// A structural key with no value, e.g. a section marker.
    Label,
}

impl StoredValue {
    pub fn native_type(&self) -> NativeType {
        match self {
            StoredValue::Long(_) | StoredValue::LongArray(_) => NativeType::Long,
            StoredValue::Double(_) | StoredValue::DoubleArray(_) => NativeType::Double,
            StoredValue::Text(_) => NativeType::String,
            StoredValue::Bytes(_) => NativeType::Bytes,
            StoredValue::Label => NativeType::Label,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            StoredValue::LongArray(v) => v.len(),
            StoredValue::DoubleArray(v) => v.len(),
            StoredValue::Bytes(v) => v.len(),
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric contents as doubles.
    pub fn as_doubles(&self) -> Option<Vec<f64>> {
        match self {
            StoredValue::Long(v) => Some(vec![*v as f64]),
            StoredValue::Double(v) => Some(vec![*v]),
            StoredValue::LongArray(v) => Some(v.iter().map(|x| *x as f64).collect()),
            StoredValue::DoubleArray(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl From<i64> for StoredValue {
    fn from(v: i64) -> Self {
        StoredValue::Long(v)
    }
}

impl From<i32> for StoredValue {
    fn from(v: i32) -> Self {
        StoredValue::Long(v as i64)
    }
}

impl From<f64> for StoredValue {
    fn from(v: f64) -> Self {
        StoredValue::Double(v)
    }
}

impl From<&str> for StoredValue {
    fn from(v: &str) -> Self {
        StoredValue::Text(v.to_string())
    }
}

impl From<String> for StoredValue {
    fn from(v: String) -> Self {
        StoredValue::Text(v)
    }
}

impl From<Vec<i64>> for StoredValue {
    fn from(v: Vec<i64>) -> Self {
        StoredValue::LongArray(v)
    }
}

impl From<Vec<f64>> for StoredValue {
    fn from(v: Vec<f64>) -> Self {
        StoredValue::DoubleArray(v)
    }
}

/// Decoder over an ordered in-memory key table.
#[derive(Debug, Clone, Default)]
pub struct MemoryDecoder {
    order: Vec<String>,
    entries: HashMap<String, StoredValue>,
    read_only: HashSet<String>,
    encoded: Option<Bytes>,
    mutation_calls: usize,
}

impl MemoryDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a writable key.
    pub fn with(mut self, key: &str, value: impl Into<StoredValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style insert of a read-only key.
    pub fn with_read_only(mut self, key: &str, value: impl Into<StoredValue>) -> Self {
        self.insert(key, value);
        self.read_only.insert(key.to_string());
        self
    }

    /// Attach the encoded form returned by [`Decoder::message_bytes`].
    pub fn with_encoded(mut self, encoded: impl Into<Bytes>) -> Self {
        self.encoded = Some(encoded.into());
        self
    }

    /// Insert or replace a key, keeping its original position.
    pub fn insert(&mut self, key: &str, value: impl Into<StoredValue>) {
        if self.entries.insert(key.to_string(), value.into()).is_none() {
            self.order.push(key.to_string());
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<StoredValue> {
        self.order.retain(|k| k != key);
        self.read_only.remove(key);
        self.entries.remove(key)
    }

    pub fn value(&self, key: &str) -> Option<&StoredValue> {
        self.entries.get(key)
    }

    /// Number of setter calls made, including rejected ones.
    pub fn mutation_calls(&self) -> usize {
        self.mutation_calls
    }

    fn entry(&self, key: &str) -> DecoderResult<&StoredValue> {
        self.entries.get(key).ok_or_else(|| DecoderError::not_found(key))
    }

    fn writable(&mut self, key: &str) -> DecoderResult<&mut StoredValue> {
        self.mutation_calls += 1;
        if self.read_only.contains(key) {
            return Err(DecoderError::read_only(key));
        }
        self.entries
            .get_mut(key)
            .ok_or_else(|| DecoderError::not_found(key))
    }
}

impl Decoder for MemoryDecoder {
    fn keys(&self, filter: KeyFilter) -> DecoderResult<Vec<String>> {
        Ok(match filter {
            KeyFilter::All => self.order.clone(),
            KeyFilter::ReadOnly => self
                .order
                .iter()
                .filter(|k| self.read_only.contains(*k))
                .cloned()
                .collect(),
        })
    }

    fn native_type(&self, key: &str) -> DecoderResult<NativeType> {
        Ok(self.entry(key)?.native_type())
    }

    fn size(&self, key: &str) -> DecoderResult<usize> {
        Ok(self.entry(key)?.len())
    }

    fn is_defined(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn is_missing(&self, key: &str) -> DecoderResult<bool> {
        Ok(match self.entry(key)? {
            StoredValue::Long(v) => *v == MISSING_LONG,
            StoredValue::Double(v) => *v == MISSING_DOUBLE,
            _ => false,
        })
    }

    fn get_long(&self, key: &str) -> DecoderResult<i64> {
        match self.entry(key)? {
            StoredValue::Long(v) => Ok(*v),
            StoredValue::Double(v) => Ok(*v as i64),
            StoredValue::LongArray(v) if v.len() == 1 => Ok(v[0]),
            StoredValue::DoubleArray(v) if v.len() == 1 => Ok(v[0] as i64),
            StoredValue::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| DecoderError::wrong_type(key, "text is not an integer")),
            other => Err(DecoderError::wrong_type(key, format!("{:?}", other.native_type()))),
        }
    }

    fn get_double(&self, key: &str) -> DecoderResult<f64> {
        match self.entry(key)? {
            StoredValue::Long(v) => Ok(*v as f64),
            StoredValue::Double(v) => Ok(*v),
            StoredValue::LongArray(v) if v.len() == 1 => Ok(v[0] as f64),
            StoredValue::DoubleArray(v) if v.len() == 1 => Ok(v[0]),
            StoredValue::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| DecoderError::wrong_type(key, "text is not a number")),
            other => Err(DecoderError::wrong_type(key, format!("{:?}", other.native_type()))),
        }
    }

    fn get_string(&self, key: &str) -> DecoderResult<String> {
        match self.entry(key)? {
            StoredValue::Text(s) => Ok(s.clone()),
            StoredValue::Long(v) => Ok(v.to_string()),
            StoredValue::Double(v) => Ok(v.to_string()),
            other => Err(DecoderError::wrong_type(key, format!("{:?}", other.native_type()))),
        }
    }

    fn get_long_array(&self, key: &str) -> DecoderResult<Vec<i64>> {
        match self.entry(key)? {
            StoredValue::LongArray(v) => Ok(v.clone()),
            StoredValue::DoubleArray(v) => Ok(v.iter().map(|x| *x as i64).collect()),
            StoredValue::Long(v) => Ok(vec![*v]),
            StoredValue::Double(v) => Ok(vec![*v as i64]),
            other => Err(DecoderError::wrong_type(key, format!("{:?}", other.native_type()))),
        }
    }

    fn get_double_array(&self, key: &str) -> DecoderResult<Vec<f64>> {
        match self.entry(key)? {
            StoredValue::DoubleArray(v) => Ok(v.clone()),
            StoredValue::LongArray(v) => Ok(v.iter().map(|x| *x as f64).collect()),
            StoredValue::Long(v) => Ok(vec![*v as f64]),
            StoredValue::Double(v) => Ok(vec![*v]),
            other => Err(DecoderError::wrong_type(key, format!("{:?}", other.native_type()))),
        }
    }

    fn set_long(&mut self, key: &str, value: i64) -> DecoderResult<()> {
        let slot = self.writable(key)?;
        *slot = match &*slot {
            StoredValue::Long(_) => StoredValue::Long(value),
            StoredValue::Double(_) => StoredValue::Double(value as f64),
            StoredValue::Text(_) => StoredValue::Text(value.to_string()),
            StoredValue::LongArray(v) if v.len() == 1 => StoredValue::LongArray(vec![value]),
            StoredValue::DoubleArray(v) if v.len() == 1 => StoredValue::DoubleArray(vec![value as f64]),
            other => return Err(DecoderError::wrong_type(key, format!("{:?}", other.native_type()))),
        };
        Ok(())
    }

    fn set_double(&mut self, key: &str, value: f64) -> DecoderResult<()> {
        let slot = self.writable(key)?;
        *slot = match &*slot {
            StoredValue::Long(_) => StoredValue::Long(value as i64),
            StoredValue::Double(_) => StoredValue::Double(value),
            StoredValue::Text(_) => StoredValue::Text(value.to_string()),
            StoredValue::LongArray(v) if v.len() == 1 => StoredValue::LongArray(vec![value as i64]),
            StoredValue::DoubleArray(v) if v.len() == 1 => StoredValue::DoubleArray(vec![value]),
            other => return Err(DecoderError::wrong_type(key, format!("{:?}", other.native_type()))),
        };
        Ok(())
    }

    fn set_string(&mut self, key: &str, value: &str) -> DecoderResult<()> {
        let slot = self.writable(key)?;
        *slot = match &*slot {
            StoredValue::Text(_) => StoredValue::Text(value.to_string()),
            StoredValue::Long(_) => StoredValue::Long(
                value
                    .trim()
                    .parse()
                    .map_err(|_| DecoderError::wrong_type(key, "text is not an integer"))?,
            ),
            StoredValue::Double(_) => StoredValue::Double(
                value
                    .trim()
                    .parse()
                    .map_err(|_| DecoderError::wrong_type(key, "text is not a number"))?,
            ),
            other => return Err(DecoderError::wrong_type(key, format!("{:?}", other.native_type()))),
        };
        Ok(())
    }

    fn set_long_array(&mut self, key: &str, values: &[i64]) -> DecoderResult<()> {
        let slot = self.writable(key)?;
        *slot = match &*slot {
            StoredValue::LongArray(_) => StoredValue::LongArray(values.to_vec()),
            StoredValue::DoubleArray(_) => {
                StoredValue::DoubleArray(values.iter().map(|v| *v as f64).collect())
            }
            StoredValue::Long(_) if values.len() == 1 => StoredValue::Long(values[0]),
            StoredValue::Double(_) if values.len() == 1 => StoredValue::Double(values[0] as f64),
            other => return Err(DecoderError::wrong_type(key, format!("{:?}", other.native_type()))),
        };
        Ok(())
    }

    fn set_double_array(&mut self, key: &str, values: &[f64]) -> DecoderResult<()> {
        let slot = self.writable(key)?;
        *slot = match &*slot {
            StoredValue::DoubleArray(_) => StoredValue::DoubleArray(values.to_vec()),
            StoredValue::LongArray(_) => {
                StoredValue::LongArray(values.iter().map(|v| *v as i64).collect())
            }
            StoredValue::Long(_) if values.len() == 1 => StoredValue::Long(values[0] as i64),
            StoredValue::Double(_) if values.len() == 1 => StoredValue::Double(values[0]),
            other => return Err(DecoderError::wrong_type(key, format!("{:?}", other.native_type()))),
        };
        Ok(())
    }

    fn message_bytes(&self) -> DecoderResult<Bytes> {
        self.encoded
            .clone()
            .ok_or_else(|| DecoderError::new(DecoderError::NO_MESSAGE, "no encoded message attached"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoder() -> MemoryDecoder {
        MemoryDecoder::new()
            .with("Ni", 4)
            .with_read_only("gridType", "regular_ll")
            .with("values", vec![1.0, 2.0, 3.0, 4.0])
            .with("pl", vec![4i64, 8, 4])
            .with("section1", StoredValue::Label)
    }

    #[test]
    fn test_keys_keep_insertion_order() {
        let d = decoder();
        assert_eq!(
            d.keys(KeyFilter::All).unwrap(),
            vec!["Ni", "gridType", "values", "pl", "section1"]
        );
        assert_eq!(d.keys(KeyFilter::ReadOnly).unwrap(), vec!["gridType"]);
    }

    #[test]
    fn test_native_types_and_sizes() {
        let d = decoder();
        assert_eq!(d.native_type("Ni").unwrap(), NativeType::Long);
        assert_eq!(d.native_type("values").unwrap(), NativeType::Double);
        assert_eq!(d.native_type("section1").unwrap(), NativeType::Label);
        assert_eq!(d.size("values").unwrap(), 4);
        assert_eq!(d.size("gridType").unwrap(), 1);
        assert_eq!(d.native_type("nope").unwrap_err().code, DecoderError::NOT_FOUND);
    }

    #[test]
    fn test_numeric_conversions() {
        let d = decoder();
        assert_eq!(d.get_double("Ni").unwrap(), 4.0);
        assert_eq!(d.get_long_array("values").unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(d.get_double_array("pl").unwrap(), vec![4.0, 8.0, 4.0]);
        assert_eq!(d.get_string("Ni").unwrap(), "4");
    }

    #[test]
    fn test_setters_keep_native_type() {
        let mut d = decoder();
        d.set_double("Ni", 7.9).unwrap();
        assert_eq!(d.value("Ni"), Some(&StoredValue::Long(7)));
        d.set_long_array("values", &[5, 6]).unwrap();
        assert_eq!(d.value("values"), Some(&StoredValue::DoubleArray(vec![5.0, 6.0])));
        assert_eq!(d.mutation_calls(), 2);
    }

    #[test]
    fn test_read_only_and_unknown_keys_rejected() {
        let mut d = decoder();
        let err = d.set_string("gridType", "regular_gg").unwrap_err();
        assert_eq!(err.code, DecoderError::READ_ONLY);
        let err = d.set_long("nope", 1).unwrap_err();
        assert_eq!(err.code, DecoderError::NOT_FOUND);
        assert_eq!(d.mutation_calls(), 2);
        assert_eq!(d.value("gridType"), Some(&StoredValue::Text("regular_ll".into())));
    }

    #[test]
    fn test_missing_sentinels() {
        let d = MemoryDecoder::new()
            .with("scaleFactor", MISSING_LONG)
            .with("level", 500);
        assert!(d.is_missing("scaleFactor").unwrap());
        assert!(!d.is_missing("level").unwrap());
    }

    #[test]
    fn test_message_bytes() {
        let d = decoder();
        assert_eq!(d.message_bytes().unwrap_err().code, DecoderError::NO_MESSAGE);
        let d = d.with_encoded(Bytes::from_static(b"GRIB7777"));
        assert_eq!(&d.message_bytes().unwrap()[..], b"GRIB7777");
    }

    #[test]
    fn test_remove_forgets_key() {
        let mut d = decoder();
        d.remove("gridType");
        assert!(!d.is_defined("gridType"));
        assert!(d.keys(KeyFilter::ReadOnly).unwrap().is_empty());
    }
}
