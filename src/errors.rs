//! Typed error hierarchy for pharmalog.
//!
//! Two enums cover the two places input can be refused:
//! - `StoreError` - reading, writing and mutating the JSON files
//! - `ValidationError` - turning form input into records

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the JSON-file stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Employee '{name}' already exists.")]
    EmployeeExists { name: String },

    #[error("Employee '{name}' not found.")]
    EmployeeNotFound { name: String },

    #[error("Error type '{name}' already exists.")]
    ErrorTypeExists { name: String },

    #[error("Error type '{name}' not found.")]
    ErrorTypeNotFound { name: String },

    #[error("{what} cannot be empty.")]
    EmptyName { what: &'static str },

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to lock {path}: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by the request rather than by the filesystem.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            StoreError::EmployeeExists { .. }
                | StoreError::ErrorTypeExists { .. }
                | StoreError::EmptyName { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::EmployeeNotFound { .. } | StoreError::ErrorTypeNotFound { .. }
        )
    }
}

/// Errors from form validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required field '{0}' is empty.")]
    MissingField(&'static str),

    #[error("NR must be a whole number, got '{0}'.")]
    InvalidNr(String),

    #[error("Value must be numeric, got '{0}'.")]
    InvalidAmount(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD.")]
    InvalidDate(String),

    #[error("Invalid {field}: {message}")]
    InvalidChoice { field: &'static str, message: String },

    #[error("Start date {start} is after end date {end}.")]
    InvertedRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("No error types registered. Add one with 'pharmalog error-type add' first.")]
    NoErrorTypes,
}
