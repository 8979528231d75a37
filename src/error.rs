//! Error types for Eddy.
//!
//! Every variant is a load-time failure. Once a [`Dataset`](crate::store::Dataset)
//! exists, queries cannot fail.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Eddy operations.
pub type Result<T> = std::result::Result<T, EddyError>;

/// Errors that can occur while building a dataset.
#[derive(Debug, Error)]
pub enum EddyError {
    /// Failed to open a file.
    #[error("Failed to open file: {path}")]
    FileOpen {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to read NetCDF file.
    #[error("NetCDF error: {0}")]
    NetCDF(String),

    /// A required variable is absent from the file.
    #[error("Missing required variable: {name}")]
    MissingVariable {
        /// Name of the variable that was looked up.
        name: String,
    },

    /// Array sizes do not line up.
    #[error("Shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// What was being checked.
        context: String,
        /// Expected element count (or divisor).
        expected: usize,
        /// Actual element count.
        actual: usize,
    },

    /// A required variable has a non-numeric type.
    #[error("Variable '{name}' has unsupported type {dtype}")]
    UnsupportedType {
        /// Variable name.
        name: String,
        /// Declared type as reported by the file.
        dtype: String,
    },

    /// Time units or a requested datetime could not be interpreted.
    #[error("Invalid time units: {0}")]
    InvalidTimeUnits(String),

    /// A query line could not be parsed.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl EddyError {
    /// Create a FileOpen error.
    pub fn file_open(path: PathBuf, source: std::io::Error) -> Self {
        Self::FileOpen { path, source }
    }

    /// Create a MissingVariable error.
    pub fn missing_variable(name: impl Into<String>) -> Self {
        Self::MissingVariable { name: name.into() }
    }

    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }
}

impl From<netcdf::Error> for EddyError {
    fn from(err: netcdf::Error) -> Self {
        Self::NetCDF(err.to_string())
    }
}
