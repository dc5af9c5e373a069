//! Error types for GRIB message access.

use projection::ProjectionError;
use thiserror::Error;

use crate::decoder::DecoderError;

/// Result type alias using GribError.
pub type Result<T> = std::result::Result<T, GribError>;

/// Errors raised while reading, writing or geolocating a message.
#[derive(Debug, Error)]
pub enum GribError {
    // === Key access ===
    /// The decoder rejected an operation on a key.
    #[error("decoder error on '{key}': {source}")]
    Decoder {
        key: String,
        #[source]
        source: DecoderError,
    },

    #[error("key '{0}' is read-only")]
    ReadOnly(String),

    #[error("key '{0}' not found in message")]
    KeyNotFound(String),

    #[error("unsupported type for key '{key}': {detail}")]
    UnsupportedType { key: String, detail: String },

    /// A key holds a value that cannot be interpreted.
    #[error("invalid value for key '{key}': {detail}")]
    InvalidValue { key: String, detail: String },

    // === Geolocation ===
    #[error("unsupported grid type: {0}")]
    UnsupportedGrid(String),

    #[error("unknown shape of the earth: {0}")]
    UnknownEarthShape(i64),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    // === Data arrays ===
    #[error("shape error: {0}")]
    Shape(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl GribError {
    pub fn decoder(key: &str, source: DecoderError) -> Self {
        Self::Decoder {
            key: key.to_string(),
            source,
        }
    }

    pub fn unsupported_type(key: &str, detail: impl Into<String>) -> Self {
        Self::UnsupportedType {
            key: key.to_string(),
            detail: detail.into(),
        }
    }

    pub fn invalid_value(key: &str, detail: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            detail: detail.into(),
        }
    }

    /// True for errors caused by addressing a key that cannot be written or
    /// does not exist.
    pub fn is_access_error(&self) -> bool {
        matches!(self, Self::ReadOnly(_) | Self::KeyNotFound(_))
    }
}

/// Attaches the key name to decoder results.
pub(crate) trait ForKey<T> {
    fn for_key(self, key: &str) -> Result<T>;
}

impl<T> ForKey<T> for std::result::Result<T, DecoderError> {
    fn for_key(self, key: &str) -> Result<T> {
        self.map_err(|source| GribError::decoder(key, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_errors() {
        assert!(GribError::ReadOnly("Ni".into()).is_access_error());
        assert!(GribError::KeyNotFound("foo".into()).is_access_error());
        assert!(!GribError::Shape("3-D".into()).is_access_error());
    }

    #[test]
    fn test_decoder_error_carries_key() {
        let result: std::result::Result<i64, DecoderError> = Err(DecoderError::not_found("Nx"));
        let err = result.for_key("Nx").unwrap_err();
        assert!(err.to_string().contains("'Nx'"));
        assert!(matches!(err, GribError::Decoder { .. }));
    }

    #[test]
    fn test_projection_error_converts() {
        let err: GribError = ProjectionError::UnknownProjection("tmerc".into()).into();
        assert!(matches!(err, GribError::Projection(_)));
    }
}
