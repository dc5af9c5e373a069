//! The boundary to the byte-level GRIB decoding engine.
//!
//! A [`Decoder`] owns one decoded message and answers key-level questions
//! about it: which keys exist, what native type each has, and how many
//! elements it holds. Values are copied out of (and into) the decoder, so
//! nothing returned here aliases decoder memory.

use bytes::Bytes;
use thiserror::Error;

/// Value of a long key the decoder reports as missing.
pub const MISSING_LONG: i64 = 2_147_483_647;

/// Value of a double key the decoder reports as missing.
pub const MISSING_DOUBLE: f64 = -1.0e100;

/// Native type tag the decoder reports for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeType {
    Undefined,
    Long,
    Double,
    String,
    Bytes,
    Section,
    Label,
    Missing,
}

/// Which keys [`Decoder::keys`] enumerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFilter {
    All,
    ReadOnly,
}

/// Failure reported by the decoder, with its numeric code and text.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{message} (code {code})")]
pub struct DecoderError {
    pub code: i32,
    pub message: String,
}

impl DecoderError {
    pub const ARRAY_TOO_SMALL: i32 = -6;
    pub const NOT_FOUND: i32 = -10;
    pub const READ_ONLY: i32 = -18;
    pub const WRONG_TYPE: i32 = -39;
    pub const NO_MESSAGE: i32 = -51;

    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(key: &str) -> Self {
        Self::new(Self::NOT_FOUND, format!("key/value not found: {}", key))
    }

    pub fn read_only(key: &str) -> Self {
        Self::new(Self::READ_ONLY, format!("value is read only: {}", key))
    }

    pub fn wrong_type(key: &str, detail: impl std::fmt::Display) -> Self {
        Self::new(Self::WRONG_TYPE, format!("wrong type for {}: {}", key, detail))
    }
}

/// Result type alias for decoder calls.
pub type DecoderResult<T> = std::result::Result<T, DecoderError>;

/// Key-level access to one decoded GRIB message.
///
/// Implementations convert between long and double freely, as GRIB decoders
/// do. Setters only modify keys that already exist.
pub trait Decoder {
    /// Key names in decoder order.
    fn keys(&self, filter: KeyFilter) -> DecoderResult<Vec<String>>;

    fn native_type(&self, key: &str) -> DecoderResult<NativeType>;

    /// Number of elements held by `key` (1 for scalars and strings).
    fn size(&self, key: &str) -> DecoderResult<usize>;

    fn is_defined(&self, key: &str) -> bool;

    /// Whether the key holds its type's missing sentinel.
    fn is_missing(&self, key: &str) -> DecoderResult<bool>;

    fn get_long(&self, key: &str) -> DecoderResult<i64>;
    fn get_double(&self, key: &str) -> DecoderResult<f64>;
    fn get_string(&self, key: &str) -> DecoderResult<String>;
    fn get_long_array(&self, key: &str) -> DecoderResult<Vec<i64>>;
    fn get_double_array(&self, key: &str) -> DecoderResult<Vec<f64>>;

    fn set_long(&mut self, key: &str, value: i64) -> DecoderResult<()>;
    fn set_double(&mut self, key: &str, value: f64) -> DecoderResult<()>;
    fn set_string(&mut self, key: &str, value: &str) -> DecoderResult<()>;
    fn set_long_array(&mut self, key: &str, values: &[i64]) -> DecoderResult<()>;
    fn set_double_array(&mut self, key: &str, values: &[f64]) -> DecoderResult<()>;

    /// The complete encoded message reflecting all mutations so far.
    fn message_bytes(&self) -> DecoderResult<Bytes>;
}

impl<D: Decoder + ?Sized> Decoder for Box<D> {
    fn keys(&self, filter: KeyFilter) -> DecoderResult<Vec<String>> {
        (**self).keys(filter)
    }
    fn native_type(&self, key: &str) -> DecoderResult<NativeType> {
        (**self).native_type(key)
    }
    fn size(&self, key: &str) -> DecoderResult<usize> {
        (**self).size(key)
    }
    fn is_defined(&self, key: &str) -> bool {
        (**self).is_defined(key)
    }
    fn is_missing(&self, key: &str) -> DecoderResult<bool> {
        (**self).is_missing(key)
    }
    fn get_long(&self, key: &str) -> DecoderResult<i64> {
        (**self).get_long(key)
    }
    fn get_double(&self, key: &str) -> DecoderResult<f64> {
        (**self).get_double(key)
    }
    fn get_string(&self, key: &str) -> DecoderResult<String> {
        (**self).get_string(key)
    }
    fn get_long_array(&self, key: &str) -> DecoderResult<Vec<i64>> {
        (**self).get_long_array(key)
    }
    fn get_double_array(&self, key: &str) -> DecoderResult<Vec<f64>> {
        (**self).get_double_array(key)
    }
    fn set_long(&mut self, key: &str, value: i64) -> DecoderResult<()> {
        (**self).set_long(key, value)
    }
    fn set_double(&mut self, key: &str, value: f64) -> DecoderResult<()> {
        (**self).set_double(key, value)
    }
    fn set_string(&mut self, key: &str, value: &str) -> DecoderResult<()> {
        (**self).set_string(key, value)
    }
    fn set_long_array(&mut self, key: &str, values: &[i64]) -> DecoderResult<()> {
        (**self).set_long_array(key, values)
    }
    fn set_double_array(&mut self, key: &str, values: &[f64]) -> DecoderResult<()> {
        (**self).set_double_array(key, values)
    }
    fn message_bytes(&self) -> DecoderResult<Bytes> {
        (**self).message_bytes()
    }
}
