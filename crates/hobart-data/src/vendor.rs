//! The vendor session abstraction.
//!
//! Factors never initialize a vendor connection themselves. A composition
//! root builds one session object per process and passes it into each
//! factor's constructor; `run` calls stay synchronous and stateless.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use hobart_engine::{LiveQuote, RawObservation};

/// Which instrument listing to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentKind {
    /// Listed equities.
    Stock,
    /// Market indices.
    Index,
}

/// Daily price field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    /// Opening price.
    Open,
    /// Closing price.
    Close,
}

/// Price adjustment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    /// Unadjusted prices.
    None,
    /// Pre-adjusted (split/dividend adjusted backwards from today).
    Pre,
}

/// One vendor session: trading calendar, listings, daily series and the
/// intraday snapshot feed.
///
/// All methods are blocking single fetches. Errors propagate to the caller;
/// retry policy is not a session concern.
pub trait MarketDataSession: Send + Sync {
    /// Trading dates between `start` and `end` inclusive, ascending.
    fn trading_dates(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>>;

    /// All instrument codes of the given kind, canonical form.
    fn instruments(&self, kind: InstrumentKind) -> Result<Vec<String>>;

    /// Daily prices for the given codes. Sparse: codes may be missing on
    /// some or all dates.
    fn daily_prices(
        &self,
        codes: &[String],
        field: PriceField,
        adjust: Adjustment,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawObservation>>;

    /// Index membership: for each date on which the component list changed,
    /// the full member list as of that date.
    fn index_components(
        &self,
        index: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, Vec<String>>>;

    /// Special-treatment flags, one observation per flagged instrument/date,
    /// value 1.0.
    fn special_treatment(
        &self,
        codes: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawObservation>>;

    /// Industry classification codes per instrument as of `date`.
    fn industry(&self, codes: &[String], date: NaiveDate) -> Result<Vec<(String, f64)>>;

    /// Current intraday snapshot for the given codes. Instruments without a
    /// quote right now are absent from the result.
    fn snapshot(&self, codes: &[String]) -> Result<Vec<LiveQuote>>;
}
