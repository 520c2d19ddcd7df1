//! Error types and error code constants for irmark.
//!
//! This module provides a unified error type (`IrmarkError`) that bridges
//! domain-specific errors from the decoder, annotation extractor, registry,
//! and configuration loader into a common format suitable for JSON output.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments or configuration (bad input from caller)
//! - `3`: Format errors (malformed annotation, unreadable IR)
//! - `4`: Duplicate identifier binding during extraction
//! - `5`: Check failed (expected and computed facts disagree)
//! - `10`: Internal errors (I/O, unexpected state)

use std::fmt;

use thiserror::Error;

use crate::annotation::AnnotationError;
use crate::config::ConfigError;
use crate::decode::DecodeError;
use crate::registry::RegistryError;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output.
///
/// These codes map to CLI exit codes and appear in JSON error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments or configuration.
    InvalidArguments = 2,
    /// Malformed annotation or IR input.
    FormatError = 3,
    /// Two facts bound to one identifier.
    DuplicateId = 4,
    /// Expected and computed facts disagree.
    CheckFailed = 5,
    /// Internal errors (I/O, bugs).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
#[derive(Debug, Error)]
pub enum IrmarkError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An annotation could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A fixture's annotations are malformed.
    #[error("{path}: {source}")]
    Annotation {
        path: String,
        #[source]
        source: AnnotationError,
    },

    /// The IR input could not be read as a component.
    #[error("invalid IR in {path}: {message}")]
    InvalidIr { path: String, message: String },

    /// Extraction bound two facts to one identifier.
    #[error(transparent)]
    DuplicateId(#[from] RegistryError),

    /// Expected and computed facts disagree.
    #[error("check failed: {mismatches} mismatch(es)")]
    CheckFailed { mismatches: usize },

    /// File system error.
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&IrmarkError> for OutputErrorCode {
    fn from(err: &IrmarkError) -> Self {
        match err {
            IrmarkError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            IrmarkError::Config(_) => OutputErrorCode::InvalidArguments,
            IrmarkError::Decode(_) => OutputErrorCode::FormatError,
            IrmarkError::Annotation { .. } => OutputErrorCode::FormatError,
            IrmarkError::InvalidIr { .. } => OutputErrorCode::FormatError,
            IrmarkError::DuplicateId(_) => OutputErrorCode::DuplicateId,
            IrmarkError::CheckFailed { .. } => OutputErrorCode::CheckFailed,
            IrmarkError::Io { .. } => OutputErrorCode::InternalError,
            IrmarkError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<IrmarkError> for OutputErrorCode {
    fn from(err: IrmarkError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl IrmarkError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        IrmarkError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create an I/O error for `path`.
    pub fn io(path: impl fmt::Display, err: std::io::Error) -> Self {
        IrmarkError::Io {
            path: path.to_string(),
            message: err.to_string(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        IrmarkError::InternalError {
            message: message.into(),
        }
    }
}
