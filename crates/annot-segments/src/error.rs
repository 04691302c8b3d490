//! Error types for segment operations.

use std::path::PathBuf;

use annot_models::IntervalError;
use thiserror::Error;

/// Result type for segment operations.
pub type SegmentResult<T> = Result<T, SegmentError>;

/// Errors that can occur in the segment algebra and its table boundary.
#[derive(Debug, Error)]
pub enum SegmentError {
    #[error("unrecognized classification mode '{0}' (expected 'music' or 'speech')")]
    InvalidMode(String),

    #[error("malformed record at row {row}: {message}")]
    MalformedRecord { row: u64, message: String },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("invalid interval: {0}")]
    Interval(#[from] IntervalError),

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SegmentError {
    /// Create a malformed-record error for a 1-based file row.
    pub fn malformed(row: u64, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            row,
            message: message.into(),
        }
    }

    /// Create an invalid-parameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }
}
