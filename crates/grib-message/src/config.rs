//! Per-message configuration.

use serde::{Deserialize, Serialize};

/// Options copied into each [`GribMessage`](crate::GribMessage) at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageOptions {
    /// Expand reduced grids to a regular width when materializing `values`.
    pub expand_reduced: bool,

    /// Fill value used when a message carries no `missingValue` key.
    pub missing_value: f64,

    /// Maximum length in bytes of text values read from the decoder.
    pub text_capacity: usize,

    /// Coordinate written for space-view pixels that fall off the earth disk.
    pub undefined_coordinate: f64,
}

impl Default for MessageOptions {
    fn default() -> Self {
        Self {
            expand_reduced: true,
            missing_value: 1.0e30,
            text_capacity: 1024,
            undefined_coordinate: 1.0e30,
        }
    }
}

impl MessageOptions {
    /// Load options from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GRIB_EXPAND_REDUCED") {
            config.expand_reduced = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("GRIB_MISSING_VALUE") {
            if let Ok(value) = val.parse() {
                config.missing_value = value;
            }
        }

        if let Ok(val) = std::env::var("GRIB_TEXT_CAPACITY") {
            if let Ok(size) = val.parse() {
                config.text_capacity = size;
            }
        }

        if let Ok(val) = std::env::var("GRIB_UNDEFINED_COORDINATE") {
            if let Ok(value) = val.parse() {
                config.undefined_coordinate = value;
            }
        }

        config
    }

    /// Validate the options.
    pub fn validate(&self) -> Result<(), String> {
        if self.text_capacity == 0 {
            return Err("text_capacity must be > 0".to_string());
        }

        if self.missing_value.is_nan() {
            return Err("missing_value must not be NaN".to_string());
        }

        if self.undefined_coordinate.is_nan() {
            return Err("undefined_coordinate must not be NaN".to_string());
        }

        Ok(())
    }
}
