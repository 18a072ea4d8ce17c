//! Error types for the data-loader crate.
//!
//! Every failure while reading the historical table or the encoder bundle
//! ends up as a `DataLoadError`. Loading happens once at startup, so these
//! errors are fatal for the process rather than per-request.

use std::io;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading the historical dataset or encoders
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error other than a missing file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader rejected the input (bad quoting, ragged rows, ...)
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// The encoder bundle was not valid JSON for the expected shape
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A column the feature pipeline depends on is absent from the header
    #[error("Missing column '{column}' in {file}")]
    MissingColumn { file: String, column: String },

    /// A cell couldn't be converted to the type its column requires
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DataLoadError {
    /// Classify a failure to open or read `path`
    pub(crate) fn from_io(path: &Path, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            DataLoadError::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            DataLoadError::IoError(err)
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
