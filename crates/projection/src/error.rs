//! Error types for projection construction.

use thiserror::Error;

/// Errors raised while building a projection from a parameter record.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectionError {
    /// The `proj` family name is not one this engine knows.
    #[error("unknown projection: {0}")]
    UnknownProjection(String),

    /// A parameter the projection family needs is absent.
    #[error("projection '{proj}' requires parameter '{param}'")]
    MissingParameter { proj: String, param: String },

    /// A parameter is present but outside its valid domain.
    #[error("invalid value for projection parameter '{param}': {message}")]
    InvalidParameter { param: String, message: String },
}

impl ProjectionError {
    pub fn missing(proj: impl Into<String>, param: impl Into<String>) -> Self {
        Self::MissingParameter {
            proj: proj.into(),
            param: param.into(),
        }
    }

    pub fn invalid(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
