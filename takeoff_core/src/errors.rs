//! # Error Types
//!
//! Structured error types for takeoff_core. The computation pipeline itself
//! treats missing data (an unresolvable profile, an unknown kg/m) as a value,
//! not an error; these variants surface at the edges: loading catalogs and
//! params, user commands on the tally list, file output and report rendering.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::errors::{TakeoffError, TakeoffResult};
//!
//! fn validate_length(length_m: f64) -> TakeoffResult<()> {
//!     if length_m < 0.0 {
//!         return Err(TakeoffError::InvalidInput {
//!             field: "length_m".to_string(),
//!             value: length_m.to_string(),
//!             reason: "Length cannot be negative".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for takeoff_core operations
pub type TakeoffResult<T> = Result<T, TakeoffError>;

/// Structured error type for takeoff operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum TakeoffError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Profile key not present in the catalog
    #[error("Profile not found: {standard}/{shape}/{size}")]
    ProfileNotFound {
        standard: String,
        shape: String,
        size: String,
    },

    /// Standard, shape or size was left empty
    #[error("Selection is incomplete: {reason}")]
    MissingSelection { reason: String },

    /// No kg/m value available for the selected profile
    #[error("Unit weight (kg/m) unknown for '{profile}'")]
    UnknownMass { profile: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Requested output format exists only as a stub
    #[error("Unsupported: {feature}")]
    Unsupported { feature: String },

    /// Typst compilation or PDF rendering failed
    #[error("Report failed: {reason}")]
    ReportFailed { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl TakeoffError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        TakeoffError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        TakeoffError::MissingField {
            field: field.into(),
        }
    }

    /// Create a ProfileNotFound error
    pub fn profile_not_found(standard: impl Into<String>, shape: impl Into<String>, size: impl Into<String>) -> Self {
        TakeoffError::ProfileNotFound {
            standard: standard.into(),
            shape: shape.into(),
            size: size.into(),
        }
    }

    /// Create a MissingSelection error
    pub fn missing_selection(reason: impl Into<String>) -> Self {
        TakeoffError::MissingSelection {
            reason: reason.into(),
        }
    }

    /// Create an UnknownMass error
    pub fn unknown_mass(profile: impl Into<String>) -> Self {
        TakeoffError::UnknownMass {
            profile: profile.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        TakeoffError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        TakeoffError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Create an Unsupported error
    pub fn unsupported(feature: impl Into<String>) -> Self {
        TakeoffError::Unsupported {
            feature: feature.into(),
        }
    }

    /// Check if this is a recoverable error (the user can fix the input and retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TakeoffError::MissingSelection { .. }
                | TakeoffError::UnknownMass { .. }
                | TakeoffError::InvalidInput { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            TakeoffError::InvalidInput { .. } => "INVALID_INPUT",
            TakeoffError::MissingField { .. } => "MISSING_FIELD",
            TakeoffError::ProfileNotFound { .. } => "PROFILE_NOT_FOUND",
            TakeoffError::MissingSelection { .. } => "MISSING_SELECTION",
            TakeoffError::UnknownMass { .. } => "UNKNOWN_MASS",
            TakeoffError::FileError { .. } => "FILE_ERROR",
            TakeoffError::SerializationError { .. } => "SERIALIZATION_ERROR",
            TakeoffError::VersionMismatch { .. } => "VERSION_MISMATCH",
            TakeoffError::Unsupported { .. } => "UNSUPPORTED",
            TakeoffError::ReportFailed { .. } => "REPORT_FAILED",
            TakeoffError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for TakeoffError {
    fn from(e: serde_json::Error) -> Self {
        TakeoffError::serialization(e.to_string())
    }
}
