use std::fmt;

use thiserror::Error;

use crate::path::FieldPath;

/// Result type for fallible engine operations.
pub type Result<T> = std::result::Result<T, RecordUiError>;

/// Errors surfaced by the engine.
///
/// Composition, rendering and draft mutation never return these for
/// configuration gaps or inconsistent stored data; those degrade locally and
/// are reported as [`Diagnostic`]s instead. Only persistence failures and
/// explicit path addressing reach callers as errors.
#[derive(Debug, Error)]
pub enum RecordUiError {
    /// A declared base key has no catalog entry.
    #[error("no catalog entry for base field '{base_key}'")]
    Configuration { base_key: String },

    /// A stored value disagrees with its declared field type.
    #[error("{path}: expected {expected}, found {found}")]
    ShapeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// No renderer capability is registered for an input kind.
    #[error("no capability registered for input '{input}'")]
    UnmappedCapability { input: String },

    /// The external store rejected a create/update/delete call.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// A declared validation failed (only produced by the opt-in checker).
    #[error("validation failed at '{path}': {message}")]
    Validation { path: String, message: String },

    /// A path did not address a reachable slot in the draft.
    #[error(transparent)]
    Path(#[from] PathError),

    /// A document could not be parsed into catalog/declaration/record form.
    #[error("invalid document: {0}")]
    Document(String),
}

/// Failures reported by a [`RecordStore`](crate::session::RecordStore).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PersistenceError {
    #[error("store rejected the request: {message}")]
    Rejected { message: String },

    #[error("record not found: {id}")]
    NotFound { id: String },

    #[error("record has no identifier; it was never saved")]
    MissingId,

    #[error("store I/O failure: {0}")]
    Io(String),
}

/// Addressing failures for [`FieldPath`]-based draft access.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PathError {
    #[error("path is empty")]
    Empty,

    #[error("{path}: index {index} out of range for {len} item(s)")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },

    #[error("{path}: cannot index into {found}")]
    NotAnArray { path: String, found: &'static str },

    #[error("{path}: no field definition at this path")]
    UnknownField { path: String },

    #[error("{path}: array already holds the maximum of {max} item(s)")]
    MaxItemsReached { path: String, max: usize },
}

/// A locally recovered degradation, reported alongside the output it affected.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    Configuration {
        base_key: String,
    },
    ShapeMismatch {
        path: FieldPath,
        expected: &'static str,
        found: &'static str,
    },
    UnmappedCapability {
        path: FieldPath,
        input: String,
    },
    InvalidPattern {
        field: String,
        pattern: String,
        message: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Configuration { base_key } => {
                write!(f, "unknown base field '{base_key}', declaration used as-is")
            }
            Diagnostic::ShapeMismatch {
                path,
                expected,
                found,
            } => write!(f, "{path}: expected {expected}, found {found}; coerced"),
            Diagnostic::UnmappedCapability { path, input } => {
                write!(f, "{path}: no capability for input '{input}', using text")
            }
            Diagnostic::InvalidPattern {
                field,
                pattern,
                message,
            } => write!(f, "{field}: invalid pattern '{pattern}': {message}"),
        }
    }
}

impl From<&Diagnostic> for RecordUiError {
    fn from(diagnostic: &Diagnostic) -> Self {
        match diagnostic {
            Diagnostic::Configuration { base_key } => RecordUiError::Configuration {
                base_key: base_key.clone(),
            },
            Diagnostic::ShapeMismatch {
                path,
                expected,
                found,
            } => RecordUiError::ShapeMismatch {
                path: path.to_string(),
                expected: *expected,
                found: *found,
            },
            Diagnostic::UnmappedCapability { input, .. } => RecordUiError::UnmappedCapability {
                input: input.clone(),
            },
            Diagnostic::InvalidPattern {
                field, message, ..
            } => RecordUiError::Validation {
                path: field.clone(),
                message: message.clone(),
            },
        }
    }
}

impl From<anyhow::Error> for RecordUiError {
    fn from(err: anyhow::Error) -> Self {
        RecordUiError::Document(format!("{err:#}"))
    }
}
