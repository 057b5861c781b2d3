//! The uniform contract every factor satisfies.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hobart_data::DataError;
use hobart_engine::{EngineError, Panel};

/// Result type for factor runs.
pub type Result<T> = std::result::Result<T, FactorError>;

/// Classification of a factor, consumed by the external scheduler/registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorType {
    /// A regular value factor (prices, returns, exposures).
    Normal,
    /// A membership/tradability pool with {0,1} cells.
    Pool,
    /// A risk-model exposure.
    Risk,
}

/// How often a factor produces rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// One row per trading day.
    Daily,
    /// One row per week.
    Weekly,
    /// One row per month.
    Monthly,
}

/// Which instrument listing a factor covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityType {
    /// Listed equities.
    Stock,
    /// Market indices.
    Index,
    /// Exchange-traded funds.
    Fund,
}

/// Errors a factor run can surface.
///
/// A run either yields a panel or an error, never both; callers must not
/// persist a panel alongside a non-`Ok` outcome.
#[derive(Debug, Error)]
pub enum FactorError {
    /// The panel engine failed (no data, bad window, ...).
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A data source failed before the engine ran.
    #[error(transparent)]
    Data(#[from] DataError),

    /// A snapshot-backed factor was built without a snapshot root.
    #[error("factor {factor} needs a snapshot root directory")]
    MissingSnapshotRoot {
        /// Factor that was asked to run.
        factor: String,
    },
}

/// A daily factor: metadata plus one behavioral operation.
///
/// `run` is synchronous, single-threaded and stateless across calls; callers
/// wanting at-most-one-concurrent-run-per-factor enforce that themselves —
/// there is no internal shared mutable state to protect.
pub trait Factor {
    /// Unique factor name.
    fn factor_name(&self) -> &str;

    /// Author of the factor definition.
    fn author(&self) -> &str;

    /// Human-readable description.
    fn desc(&self) -> &str;

    /// Classification, used by the registry only.
    fn factor_type(&self) -> FactorType;

    /// Earliest valid query start.
    fn first_start_time(&self) -> NaiveDate;

    /// Row frequency.
    fn frequency(&self) -> Frequency;

    /// Instrument listing the factor covers.
    fn security_type(&self) -> SecurityType;

    /// Declarative 7-field cron string; the core never parses or acts on it.
    fn trigger_time(&self) -> &str;

    /// Produce the panel for `[start, end]`.
    fn run(&self, start: NaiveDate, end: NaiveDate) -> Result<Panel>;
}

/// Construct a date from literal year/month/day parts.
///
/// Used in static factor definitions where the parts are known-valid.
pub const fn day(year: i32, month: u32, dom: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, dom) {
        Some(date) => date,
        None => panic!("invalid literal date"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_builds_literal_dates() {
        assert_eq!(day(2010, 1, 1), "2010-01-01".parse::<NaiveDate>().unwrap());
    }
}
