//! Bridges from the vendor session to the engine's collaborator traits.

use std::sync::Arc;

use chrono::NaiveDate;

use hobart_data::{Adjustment, InstrumentKind, MarketDataSession, PriceField};
use hobart_engine::{
    CalendarService, LiveQuote, LiveSnapshotSource, RawObservation, RawSeriesFetcher, SourceError,
};

/// Trading calendar backed by the session.
pub struct SessionCalendar(pub Arc<dyn MarketDataSession>);

impl std::fmt::Debug for SessionCalendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCalendar").finish_non_exhaustive()
    }
}

impl CalendarService for SessionCalendar {
    fn trading_dates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, SourceError> {
        Ok(self.0.trading_dates(start, end)?)
    }
}

/// Intraday snapshot feed backed by the session.
pub struct SessionLive(pub Arc<dyn MarketDataSession>);

impl std::fmt::Debug for SessionLive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLive").finish_non_exhaustive()
    }
}

impl LiveSnapshotSource for SessionLive {
    fn snapshot(&self, instruments: &[String]) -> Result<Vec<LiveQuote>, SourceError> {
        Ok(self.0.snapshot(instruments)?)
    }
}

/// Daily price series over a whole listing.
pub struct PriceSeries {
    session: Arc<dyn MarketDataSession>,
    kind: InstrumentKind,
    field: PriceField,
    adjust: Adjustment,
}

impl std::fmt::Debug for PriceSeries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceSeries")
            .field("kind", &self.kind)
            .field("field", &self.field)
            .field("adjust", &self.adjust)
            .finish_non_exhaustive()
    }
}

impl PriceSeries {
    /// Create a price series fetcher.
    pub fn new(
        session: Arc<dyn MarketDataSession>,
        kind: InstrumentKind,
        field: PriceField,
        adjust: Adjustment,
    ) -> Self {
        Self {
            session,
            kind,
            field,
            adjust,
        }
    }
}

impl RawSeriesFetcher for PriceSeries {
    fn universe(&self, _start: NaiveDate, _end: NaiveDate) -> Result<Vec<String>, SourceError> {
        Ok(self.session.instruments(self.kind)?)
    }

    fn fetch(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawObservation>, SourceError> {
        let codes = self.session.instruments(self.kind)?;
        Ok(self
            .session
            .daily_prices(&codes, self.field, self.adjust, start, end)?)
    }
}

/// Index membership as sparse 1.0 observations at component-change dates.
pub struct MembershipSeries {
    session: Arc<dyn MarketDataSession>,
    index: String,
}

impl std::fmt::Debug for MembershipSeries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MembershipSeries")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl MembershipSeries {
    /// Membership of `index` (e.g. `000300.XSHG`).
    pub fn new(session: Arc<dyn MarketDataSession>, index: impl Into<String>) -> Self {
        Self {
            session,
            index: index.into(),
        }
    }
}

impl RawSeriesFetcher for MembershipSeries {
    fn universe(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<String>, SourceError> {
        // Union of everything that was ever a member inside the window.
        let components = self.session.index_components(&self.index, start, end)?;
        let mut codes: Vec<String> = components.into_values().flatten().collect();
        codes.sort_unstable();
        codes.dedup();
        Ok(codes)
    }

    fn fetch(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawObservation>, SourceError> {
        let components = self.session.index_components(&self.index, start, end)?;
        Ok(components
            .into_iter()
            .flat_map(|(date, members)| {
                members
                    .into_iter()
                    .map(move |code| RawObservation::new(code, date, 1.0))
            })
            .collect())
    }
}

/// Special-treatment flags as sparse 1.0 observations.
pub struct StSeries {
    session: Arc<dyn MarketDataSession>,
}

impl std::fmt::Debug for StSeries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StSeries").finish_non_exhaustive()
    }
}

impl StSeries {
    /// Flags over the full stock listing.
    pub fn new(session: Arc<dyn MarketDataSession>) -> Self {
        Self { session }
    }
}

impl RawSeriesFetcher for StSeries {
    fn universe(&self, _start: NaiveDate, _end: NaiveDate) -> Result<Vec<String>, SourceError> {
        Ok(self.session.instruments(InstrumentKind::Stock)?)
    }

    fn fetch(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawObservation>, SourceError> {
        let codes = self.session.instruments(InstrumentKind::Stock)?;
        let st = self.session.special_treatment(&codes, start, end)?;
        let flagged: std::collections::BTreeSet<(NaiveDate, &str)> = st
            .iter()
            .map(|o| (o.date, o.instrument.as_str()))
            .collect();
        // The vendor's ST matrix is dense: every code gets a 0/1 cell on
        // every trading date, not only the flagged pairs.
        let mut observations = Vec::new();
        for date in self.session.trading_dates(start, end)? {
            for code in &codes {
                let flag = flagged.contains(&(date, code.as_str()));
                observations.push(RawObservation::new(
                    code.clone(),
                    date,
                    if flag { 1.0 } else { 0.0 },
                ));
            }
        }
        Ok(observations)
    }
}

/// Industry classification codes, one as-of lookup per trading date.
pub struct IndustrySeries {
    session: Arc<dyn MarketDataSession>,
}

impl std::fmt::Debug for IndustrySeries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndustrySeries").finish_non_exhaustive()
    }
}

impl IndustrySeries {
    /// Classification over the full stock listing.
    pub fn new(session: Arc<dyn MarketDataSession>) -> Self {
        Self { session }
    }
}

impl RawSeriesFetcher for IndustrySeries {
    fn universe(&self, _start: NaiveDate, _end: NaiveDate) -> Result<Vec<String>, SourceError> {
        Ok(self.session.instruments(InstrumentKind::Stock)?)
    }

    fn fetch(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawObservation>, SourceError> {
        let codes = self.session.instruments(InstrumentKind::Stock)?;
        let mut observations = Vec::new();
        for date in self.session.trading_dates(start, end)? {
            for (code, industry) in self.session.industry(&codes, date)? {
                observations.push(RawObservation::new(code, date, industry));
            }
        }
        Ok(observations)
    }
}
