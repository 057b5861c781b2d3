//! Error types for data operations.

use hobart_engine::SourceError;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// A required column is absent. Optional columns missing are tolerated
    /// at the call sites; only the primary key/date column is fatal.
    #[error("missing required column {column} in {file}")]
    MissingColumn {
        /// File the column was expected in.
        file: String,
        /// Name of the missing column.
        column: String,
    },

    /// No snapshot file exists under the configured directory.
    #[error("no snapshot file found under {dir}")]
    NoSnapshot {
        /// Directory that was scanned.
        dir: String,
    },

    /// Invalid instrument code
    #[error("invalid instrument code: {0}")]
    InvalidCode(String),

    /// The session has no data file for the requested series.
    #[error("missing data for {series}: {reason}")]
    MissingData {
        /// Name of the requested series.
        series: String,
        /// Reason for missing data.
        reason: String,
    },
}

impl From<DataError> for SourceError {
    fn from(err: DataError) -> Self {
        Self::new(err.to_string())
    }
}
