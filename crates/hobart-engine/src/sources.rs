//! Collaborator traits the engine fetches through.
//!
//! The engine never talks to a vendor directly. A composition root builds one
//! session object per process and hands the engine these narrow views of it,
//! so every `run` stays synchronous, stateless and retry-free: a failed fetch
//! propagates as a [`SourceError`] and the caller decides whether to retry.

use chrono::NaiveDate;
use thiserror::Error;

/// A single sparse observation: one instrument, one date, one value.
///
/// The provider's date index is not trusted; it may contain non-trading dates
/// or omit legitimately traded ones. Reconciliation against the trading
/// calendar happens downstream in the aligner.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    /// Instrument identifier, `<numeric>.<EXCHANGE_SUFFIX>` form.
    pub instrument: String,
    /// Observation date as labelled by the provider.
    pub date: NaiveDate,
    /// Observed value.
    pub value: f64,
}

impl RawObservation {
    /// Create a new observation.
    pub fn new(instrument: impl Into<String>, date: NaiveDate, value: f64) -> Self {
        Self {
            instrument: instrument.into(),
            date,
            value,
        }
    }
}

/// An intraday partial observation for one instrument, valid "now".
#[derive(Debug, Clone, PartialEq)]
pub struct LiveQuote {
    /// Instrument identifier.
    pub instrument: String,
    /// Intraday value (e.g. today's open).
    pub value: f64,
}

/// Error raised by a collaborator.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SourceError(String);

impl SourceError {
    /// Create a new source error from any message.
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Ordered trading dates for a market.
pub trait CalendarService {
    /// Trading dates between `start` and `end` inclusive, ascending.
    fn trading_dates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> std::result::Result<Vec<NaiveDate>, SourceError>;
}

/// Sparse per-instrument, per-date observations.
pub trait RawSeriesFetcher {
    /// The declared instrument universe for this window. Every member
    /// becomes a panel column even if it has no data in the window.
    fn universe(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> std::result::Result<Vec<String>, SourceError>;

    /// All observations in `[start, end]`. Instruments may be missing on some
    /// or all dates; that is not an error.
    fn fetch(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> std::result::Result<Vec<RawObservation>, SourceError>;
}

/// Intraday snapshot during market hours.
pub trait LiveSnapshotSource {
    /// Current partial observations for the given instruments. Instruments
    /// without a quote are simply absent from the result.
    fn snapshot(
        &self,
        instruments: &[String],
    ) -> std::result::Result<Vec<LiveQuote>, SourceError>;
}
