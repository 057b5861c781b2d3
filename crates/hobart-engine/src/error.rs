//! Error types for the panel engine.

use chrono::NaiveDate;
use thiserror::Error;

use crate::sources::SourceError;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while building a panel.
///
/// Partial absence of instrument/date cells is never an error; it is resolved
/// by the configured gap policy. Dates returned by a provider that are not in
/// the trading calendar are reconciled silently.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No instrument had any observation anywhere in the requested window.
    #[error("no data available for any instrument between {start} and {end}")]
    DataUnavailable {
        /// Start of the requested window.
        start: NaiveDate,
        /// End of the requested window.
        end: NaiveDate,
    },

    /// The declared instrument universe was empty.
    #[error("instrument universe is empty")]
    EmptyUniverse,

    /// Invalid date range
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date of the range.
        start: NaiveDate,
        /// End date of the range.
        end: NaiveDate,
    },

    /// A collaborator (calendar, raw series or live snapshot source) failed.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Polars error while producing the interchange frame.
    #[error("polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
