//! Typed key access over the decoder boundary.
//!
//! The decoder only knows native type tags and element counts. Each access
//! resolves those into a [`Marshal`] plan once, then performs exactly one
//! typed get or set. Arrays are copied out into owned `ndarray` buffers and
//! copied in from contiguous slices.

use std::borrow::Cow;

use ndarray::{Array1, ArrayBase, Data, Dimension};

use crate::catalog::KeyCatalog;
use crate::decoder::{Decoder, NativeType};
use crate::error::{ForKey, GribError, Result};
use crate::value::KeyValue;

/// How a key's value crosses the decoder boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marshal {
    LongScalar,
    LongArray,
    DoubleScalar,
    DoubleArray,
    Text,
    /// The key has no value representation (labels, sections, raw bytes).
    Ignored,
}

impl Marshal {
    pub fn resolve(native: NativeType, count: usize) -> Self {
        match native {
            NativeType::Long if count > 1 => Marshal::LongArray,
            NativeType::Long => Marshal::LongScalar,
            NativeType::Double if count > 1 => Marshal::DoubleArray,
            NativeType::Double => Marshal::DoubleScalar,
            NativeType::String => Marshal::Text,
            NativeType::Undefined
            | NativeType::Bytes
            | NativeType::Section
            | NativeType::Label
            | NativeType::Missing => Marshal::Ignored,
        }
    }
}

/// Read one key. Returns `None` for keys whose native type carries no value.
pub fn read<D: Decoder + ?Sized>(
    decoder: &D,
    key: &str,
    text_capacity: usize,
) -> Result<Option<KeyValue>> {
    let native = decoder.native_type(key).for_key(key)?;
    let count = decoder.size(key).for_key(key)?;

    let value = match Marshal::resolve(native, count) {
        Marshal::LongScalar => KeyValue::Long(decoder.get_long(key).for_key(key)?),
        Marshal::LongArray => {
            KeyValue::LongArray(Array1::from(decoder.get_long_array(key).for_key(key)?))
        }
        Marshal::DoubleScalar => KeyValue::Double(decoder.get_double(key).for_key(key)?),
        Marshal::DoubleArray => {
            KeyValue::DoubleArray(Array1::from(decoder.get_double_array(key).for_key(key)?))
        }
        Marshal::Text => KeyValue::Text(cap_text(
            decoder.get_string(key).for_key(key)?,
            text_capacity,
        )),
        Marshal::Ignored => return Ok(None),
    };
    Ok(Some(value))
}

/// Write one key.
///
/// Access is checked against the catalog before the decoder is touched.
/// Numeric keys take scalars or arrays of either numeric type; text keys
/// take text or numbers.
pub fn write<D: Decoder + ?Sized>(
    decoder: &mut D,
    catalog: &KeyCatalog,
    key: &str,
    value: &KeyValue,
) -> Result<()> {
    catalog.check_writable(key)?;

    match decoder.native_type(key).for_key(key)? {
        NativeType::Long => write_long(decoder, key, value),
        NativeType::Double => write_double(decoder, key, value),
        NativeType::String => write_text(decoder, key, value),
        other => Err(GribError::unsupported_type(
            key,
            format!("cannot write native type {:?}", other),
        )),
    }
}

fn write_long<D: Decoder + ?Sized>(decoder: &mut D, key: &str, value: &KeyValue) -> Result<()> {
    let result = match value {
        KeyValue::Long(v) => decoder.set_long(key, *v),
        KeyValue::Double(v) => decoder.set_long(key, *v as i64),
        KeyValue::LongArray(a) => decoder.set_long_array(key, &contiguous(a)),
        KeyValue::DoubleArray(_) | KeyValue::Field(_) => {
            let converted = value.to_i64_vec().unwrap_or_default();
            decoder.set_long_array(key, &converted)
        }
        KeyValue::Text(_) => {
            return Err(GribError::unsupported_type(key, "text value for an integer key"))
        }
    };
    result.for_key(key)
}

fn write_double<D: Decoder + ?Sized>(decoder: &mut D, key: &str, value: &KeyValue) -> Result<()> {
    let result = match value {
        KeyValue::Long(v) => decoder.set_double(key, *v as f64),
        KeyValue::Double(v) => decoder.set_double(key, *v),
        KeyValue::DoubleArray(a) => decoder.set_double_array(key, &contiguous(a)),
        KeyValue::Field(m) => decoder.set_double_array(key, &contiguous(m.data())),
        KeyValue::LongArray(a) => {
            let converted: Vec<f64> = a.iter().map(|v| *v as f64).collect();
            decoder.set_double_array(key, &converted)
        }
        KeyValue::Text(_) => {
            return Err(GribError::unsupported_type(key, "text value for a float key"))
        }
    };
    result.for_key(key)
}

fn write_text<D: Decoder + ?Sized>(decoder: &mut D, key: &str, value: &KeyValue) -> Result<()> {
    let text = match value {
        KeyValue::Text(s) => Cow::Borrowed(s.as_str()),
        KeyValue::Long(v) => Cow::Owned(v.to_string()),
        KeyValue::Double(v) => Cow::Owned(v.to_string()),
        other => {
            return Err(GribError::unsupported_type(
                key,
                format!("{} value for a text key", other.kind()),
            ))
        }
    };
    decoder.set_string(key, &text).for_key(key)
}

/// Elements in logical order, borrowed when already contiguous.
pub(crate) fn contiguous<A, S, Dm>(array: &ArrayBase<S, Dm>) -> Cow<'_, [A]>
where
    A: Clone,
    S: Data<Elem = A>,
    Dm: Dimension,
{
    match array.as_slice() {
        Some(slice) => Cow::Borrowed(slice),
        None => Cow::Owned(array.iter().cloned().collect()),
    }
}

/// A grid dimension key as a `usize`.
pub(crate) fn dimension(reader: &dyn KeyReader, key: &str) -> Result<usize> {
    let n = reader.long(key)?;
    usize::try_from(n).map_err(|_| GribError::invalid_value(key, format!("negative size {}", n)))
}

fn cap_text(mut text: String, capacity: usize) -> String {
    if text.len() > capacity {
        let mut end = capacity;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
    }
    let trimmed = text
        .trim_end_matches(|c: char| c.is_whitespace() || c == '\0')
        .len();
    text.truncate(trimmed);
    text
}

/// Read access to message keys, as needed by grid and value synthesis.
///
/// Only `has`, `read` and `missing` are required; the typed helpers fail
/// with [`GribError::KeyNotFound`] for absent keys and
/// [`GribError::UnsupportedType`] for values of the wrong shape.
pub trait KeyReader {
    fn has(&self, key: &str) -> bool;

    fn read(&self, key: &str) -> Result<Option<KeyValue>>;

    /// Whether the key holds the decoder's missing sentinel.
    fn missing(&self, key: &str) -> Result<bool>;

    fn value(&self, key: &str) -> Result<KeyValue> {
        self.read(key)?
            .ok_or_else(|| GribError::KeyNotFound(key.to_string()))
    }

    fn long(&self, key: &str) -> Result<i64> {
        let value = self.value(key)?;
        value.as_long().ok_or_else(|| {
            GribError::unsupported_type(key, format!("expected an integer, found {}", value.kind()))
        })
    }

    fn double(&self, key: &str) -> Result<f64> {
        let value = self.value(key)?;
        value.as_double().ok_or_else(|| {
            GribError::unsupported_type(key, format!("expected a number, found {}", value.kind()))
        })
    }

    fn text(&self, key: &str) -> Result<String> {
        match self.value(key)? {
            KeyValue::Text(s) => Ok(s),
            KeyValue::Long(v) => Ok(v.to_string()),
            KeyValue::Double(v) => Ok(v.to_string()),
            other => Err(GribError::unsupported_type(
                key,
                format!("expected text, found {}", other.kind()),
            )),
        }
    }

    fn doubles(&self, key: &str) -> Result<Array1<f64>> {
        let value = self.value(key)?;
        match value {
            KeyValue::DoubleArray(a) => Ok(a),
            other => other.to_f64_vec().map(Array1::from).ok_or_else(|| {
                GribError::unsupported_type(key, "expected numeric values, found text")
            }),
        }
    }

    fn longs(&self, key: &str) -> Result<Vec<i64>> {
        self.value(key)?.to_i64_vec().ok_or_else(|| {
            GribError::unsupported_type(key, "expected integer values, found text")
        })
    }

    fn long_or(&self, key: &str, default: i64) -> Result<i64> {
        if self.has(key) {
            self.long(key)
        } else {
            Ok(default)
        }
    }

    fn double_or(&self, key: &str, default: f64) -> Result<f64> {
        if self.has(key) {
            self.double(key)
        } else {
            Ok(default)
        }
    }

    /// True when the key exists and is non-zero.
    fn flag(&self, key: &str) -> Result<bool> {
        Ok(self.has(key) && self.long(key)? != 0)
    }
}
