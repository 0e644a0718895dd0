//! Error handling for PlateKit
//!
//! Provides the error types for the plate state manager:
//! - Plater errors (unknown identifiers, malformed geometry, missing selection)
//! - Configuration errors (loading, parsing and validating settings)
//!
//! All error types use `thiserror` for ergonomic error handling. Every plater
//! error is recoverable: the operation that produced it has left the object
//! collection and the history stacks untouched.

use crate::types::ObjectId;
use thiserror::Error;

/// Plater error type
///
/// Returned by every fallible plate operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaterError {
    /// The operation referenced an identifier that is not on the plate
    #[error("Object {id} not found")]
    NotFound {
        /// The identifier that was looked up.
        id: ObjectId,
    },

    /// Geometry handed to add/split is malformed
    #[error("Invalid geometry: {reason}")]
    InvalidGeometry {
        /// What is wrong with the geometry.
        reason: String,
    },

    /// The operation acts on the selection but nothing is selected
    #[error("No object selected")]
    EmptySelection,

    /// A numeric argument is out of its valid range
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// The parameter name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl PlaterError {
    /// Create a `NotFound` error
    pub fn not_found(id: ObjectId) -> Self {
        Self::NotFound { id }
    }

    /// Create an `InvalidGeometry` error
    pub fn invalid_geometry(reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            reason: reason.into(),
        }
    }

    /// Create an `InvalidParameter` error
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML write error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A configuration value is invalid.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for plate operations.
pub type Result<T> = std::result::Result<T, PlaterError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
