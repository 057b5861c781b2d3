//! The generic factor: one definition, executed by the shared engine.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use log::debug;

use crate::adapters::{
    IndustrySeries, MembershipSeries, PriceSeries, SessionCalendar, SessionLive, StSeries,
};
use crate::contract::{Factor, FactorError, FactorType, Frequency, Result, SecurityType};
use crate::definition::{FactorDef, SeriesSpec};
use hobart_data::{ExposureDir, MarketDataSession, WideSnapshotDir};
use hobart_engine::{
    EngineError, LiveSnapshotSource, Panel, RawSeriesFetcher, build_panel,
};

/// A factor driven entirely by its [`FactorDef`].
///
/// Holds the session object the composition root built; constructing a
/// factor never initializes a vendor connection of its own.
pub struct PanelFactor {
    def: FactorDef,
    session: Arc<dyn MarketDataSession>,
    snapshot_root: Option<PathBuf>,
}

impl std::fmt::Debug for PanelFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelFactor")
            .field("def", &self.def)
            .field("snapshot_root", &self.snapshot_root)
            .finish_non_exhaustive()
    }
}

impl PanelFactor {
    /// Build a factor over an existing session. `snapshot_root` is only
    /// needed by snapshot-backed definitions.
    pub fn new(
        def: FactorDef,
        session: Arc<dyn MarketDataSession>,
        snapshot_root: Option<PathBuf>,
    ) -> Self {
        Self {
            def,
            session,
            snapshot_root,
        }
    }

    /// The factor's definition.
    pub const fn definition(&self) -> &FactorDef {
        &self.def
    }

    fn snapshot_root(&self) -> Result<&PathBuf> {
        self.snapshot_root
            .as_ref()
            .ok_or_else(|| FactorError::MissingSnapshotRoot {
                factor: self.def.meta.name.to_string(),
            })
    }

    /// Run with an explicit clock, the single per-run capture. `run` feeds
    /// in the wall clock; tests feed in fixed instants.
    pub fn run_at(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        now: chrono::NaiveDateTime,
    ) -> Result<Panel> {
        debug!("running {} over {start}..{end}", self.def.meta.name);
        let calendar = SessionCalendar(Arc::clone(&self.session));
        let live_source = SessionLive(Arc::clone(&self.session));
        let live: Option<&dyn LiveSnapshotSource> = self
            .def
            .recipe
            .live_splice
            .then_some(&live_source as &dyn LiveSnapshotSource);

        let (fetcher, end): (Box<dyn RawSeriesFetcher>, NaiveDate) = match self.def.series {
            SeriesSpec::DailyPrice {
                kind,
                field,
                adjust,
            } => (
                Box::new(PriceSeries::new(
                    Arc::clone(&self.session),
                    kind,
                    field,
                    adjust,
                )),
                end,
            ),
            SeriesSpec::IndexMembership { index } => (
                Box::new(MembershipSeries::new(Arc::clone(&self.session), index)),
                end,
            ),
            SeriesSpec::SpecialTreatment => {
                (Box::new(StSeries::new(Arc::clone(&self.session))), end)
            }
            SeriesSpec::Industry => {
                (Box::new(IndustrySeries::new(Arc::clone(&self.session))), end)
            }
            SeriesSpec::ExposureFile { subdir, column } => {
                let dir = ExposureDir::new(self.snapshot_root()?.join(subdir), column);
                (Box::new(dir.series(start, end)?), end)
            }
            SeriesSpec::WideSnapshot { subdir, date_column } => {
                let dir = WideSnapshotDir::new(self.snapshot_root()?.join(subdir), date_column);
                let series = dir.series(start, end)?;
                // Rows past the snapshot's own history would be pure
                // extrapolation; clamp the window instead of emitting them.
                let clamped = end.min(series.last_date());
                if clamped < start {
                    return Err(EngineError::DataUnavailable { start, end }.into());
                }
                (Box::new(series), clamped)
            }
        };

        let panel = build_panel(
            &self.def.recipe,
            &calendar,
            fetcher.as_ref(),
            live,
            start,
            end,
            now,
        )?;
        Ok(panel)
    }
}

impl Factor for PanelFactor {
    fn factor_name(&self) -> &str {
        self.def.meta.name
    }

    fn author(&self) -> &str {
        self.def.meta.author
    }

    fn desc(&self) -> &str {
        self.def.meta.desc
    }

    fn factor_type(&self) -> FactorType {
        self.def.meta.factor_type
    }

    fn first_start_time(&self) -> NaiveDate {
        self.def.meta.first_start
    }

    fn frequency(&self) -> Frequency {
        self.def.meta.frequency
    }

    fn security_type(&self) -> SecurityType {
        self.def.meta.security_type
    }

    fn trigger_time(&self) -> &str {
        self.def.meta.trigger_time
    }

    fn run(&self, start: NaiveDate, end: NaiveDate) -> Result<Panel> {
        // Captured exactly once; both the splice eligibility check and the
        // spliced row's date label see this same instant.
        let now = chrono::Local::now().naive_local();
        self.run_at(start, end, now)
    }
}
