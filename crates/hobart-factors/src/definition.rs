//! Declarative factor definitions.
//!
//! A factor is metadata, a series to fetch and a panel recipe. The registry
//! holds one static table of these; nothing else differs between factors.

use chrono::NaiveDate;

use crate::contract::{FactorType, Frequency, SecurityType};
use hobart_data::{Adjustment, InstrumentKind, PriceField};
use hobart_engine::PanelRecipe;

/// Scheduler-facing metadata of one factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactorMeta {
    /// Unique factor name.
    pub name: &'static str,
    /// Author of the definition.
    pub author: &'static str,
    /// Human-readable description.
    pub desc: &'static str,
    /// Classification.
    pub factor_type: FactorType,
    /// Instrument listing covered.
    pub security_type: SecurityType,
    /// Row frequency.
    pub frequency: Frequency,
    /// Declarative 7-field cron string.
    pub trigger_time: &'static str,
    /// Earliest valid query start.
    pub first_start: NaiveDate,
}

/// Which raw series a factor reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesSpec {
    /// Daily vendor prices over a whole listing.
    DailyPrice {
        /// Listing to cover.
        kind: InstrumentKind,
        /// Price field.
        field: PriceField,
        /// Adjustment mode.
        adjust: Adjustment,
    },
    /// Index component membership.
    IndexMembership {
        /// Index identifier, canonical form.
        index: &'static str,
    },
    /// Special-treatment flags over the stock listing.
    SpecialTreatment,
    /// Industry classification codes over the stock listing.
    Industry,
    /// Per-day exposure snapshot files under `<snapshot_root>/<subdir>`.
    ExposureFile {
        /// Subdirectory under the snapshot root.
        subdir: &'static str,
        /// Exposure column to extract.
        column: &'static str,
    },
    /// Wide single-file snapshot dumps under `<snapshot_root>/<subdir>`.
    WideSnapshot {
        /// Subdirectory under the snapshot root.
        subdir: &'static str,
        /// Name of the primary date column inside each dump.
        date_column: &'static str,
    },
}

/// One complete factor definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactorDef {
    /// Metadata.
    pub meta: FactorMeta,
    /// Series to fetch.
    pub series: SeriesSpec,
    /// Panel pipeline configuration.
    pub recipe: PanelRecipe,
}
