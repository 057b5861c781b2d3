//! End-to-end builder tests against in-memory sources.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use hobart_engine::{
    CalendarService, GapPolicy, LiveQuote, LiveSnapshotSource, PanelRecipe, RawObservation,
    RawSeriesFetcher, SessionOffset, SourceError, build_panel,
};

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

/// Calendar over a fixed list of dates, restricted to the query window.
struct FixedCalendar(Vec<NaiveDate>);

impl CalendarService for FixedCalendar {
    fn trading_dates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, SourceError> {
        Ok(self
            .0
            .iter()
            .copied()
            .filter(|day| (start..=end).contains(day))
            .collect())
    }
}

struct FixedSeries {
    universe: Vec<String>,
    observations: Vec<RawObservation>,
}

impl RawSeriesFetcher for FixedSeries {
    fn universe(&self, _start: NaiveDate, _end: NaiveDate) -> Result<Vec<String>, SourceError> {
        Ok(self.universe.clone())
    }

    fn fetch(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawObservation>, SourceError> {
        Ok(self
            .observations
            .iter()
            .filter(|o| (start..=end).contains(&o.date))
            .cloned()
            .collect())
    }
}

struct FixedLive(Vec<LiveQuote>);

impl LiveSnapshotSource for FixedLive {
    fn snapshot(&self, _instruments: &[String]) -> Result<Vec<LiveQuote>, SourceError> {
        Ok(self.0.clone())
    }
}

fn calendar() -> FixedCalendar {
    FixedCalendar(vec![
        d("2024-02-27"),
        d("2024-02-28"),
        d("2024-02-29"),
    ])
}

fn open_prices() -> FixedSeries {
    FixedSeries {
        universe: vec!["600000.XSHG".to_string(), "000001.XSHE".to_string()],
        observations: vec![
            RawObservation::new("600000.XSHG", d("2024-02-27"), 10.0),
            RawObservation::new("600000.XSHG", d("2024-02-28"), 11.0),
            RawObservation::new("600000.XSHG", d("2024-02-29"), 11.0),
            // Provider emitted a non-trading Saturday row.
            RawObservation::new("000001.XSHE", d("2024-02-24"), 9.0),
            RawObservation::new("000001.XSHE", d("2024-02-27"), 9.1),
            RawObservation::new("000001.XSHE", d("2024-02-28"), 9.2),
            RawObservation::new("000001.XSHE", d("2024-02-29"), 9.3),
        ],
    }
}

fn past_now() -> NaiveDateTime {
    "2024-06-03T10:00:00".parse().unwrap()
}

#[test]
fn every_output_row_is_a_trading_date() {
    let recipe = PanelRecipe::eod(SessionOffset::SessionOpen);
    let panel = build_panel(
        &recipe,
        &calendar(),
        &open_prices(),
        None,
        d("2024-02-20"),
        d("2024-03-05"),
        past_now(),
    )
    .unwrap();

    let trading: BTreeSet<NaiveDate> = calendar()
        .trading_dates(d("2024-02-20"), d("2024-03-05"))
        .unwrap()
        .into_iter()
        .collect();
    assert!(!panel.is_empty());
    assert!(panel.dates().iter().all(|day| trading.contains(day)));
}

#[test]
fn runs_strictly_before_today_are_idempotent() {
    let recipe = PanelRecipe {
        gap_policy: GapPolicy::ForwardFill,
        session_offset: SessionOffset::SessionClose,
        return_lookahead: 0,
        live_splice: true,
    };
    let run = || {
        build_panel(
            &recipe,
            &calendar(),
            &open_prices(),
            Some(&FixedLive(vec![]) as &dyn LiveSnapshotSource),
            d("2024-02-20"),
            d("2024-02-29"),
            past_now(),
        )
        .unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn instrument_columns_sorted_regardless_of_fetch_order() {
    let recipe = PanelRecipe::eod(SessionOffset::Midnight);
    let series = FixedSeries {
        universe: vec![
            "600519.XSHG".to_string(),
            "000001.XSHE".to_string(),
            "300750.XSHE".to_string(),
        ],
        observations: vec![
            RawObservation::new("600519.XSHG", d("2024-02-27"), 1.0),
            RawObservation::new("300750.XSHE", d("2024-02-27"), 1.0),
        ],
    };
    let panel = build_panel(
        &recipe,
        &calendar(),
        &series,
        None,
        d("2024-02-20"),
        d("2024-03-05"),
        past_now(),
    )
    .unwrap();
    assert_eq!(
        panel.instruments(),
        ["000001.XSHE", "300750.XSHE", "600519.XSHG"]
    );
}

#[test]
fn live_splice_adds_today_beyond_the_fetched_calendar() {
    // Friday 2024-03-01 at 10:00, inside the morning session; the calendar
    // fetch ends on 2024-02-29 and does not know about today.
    let now: NaiveDateTime = "2024-03-01T10:00:00".parse().unwrap();
    let recipe = PanelRecipe {
        gap_policy: GapPolicy::None,
        session_offset: SessionOffset::SessionOpen,
        return_lookahead: 0,
        live_splice: true,
    };
    let live = FixedLive(vec![LiveQuote {
        instrument: "600000.XSHG".to_string(),
        value: 11.5,
    }]);
    let panel = build_panel(
        &recipe,
        &calendar(),
        &open_prices(),
        Some(&live),
        d("2024-02-20"),
        d("2024-03-05"),
        now,
    )
    .unwrap();

    assert_eq!(panel.dates().last(), Some(&d("2024-03-01")));
    assert_eq!(panel.cell(d("2024-03-01"), "600000.XSHG"), Some(11.5));
    // Instruments the snapshot did not cover stay missing on the spliced row.
    assert_eq!(panel.cell(d("2024-03-01"), "000001.XSHE"), None);
    assert_eq!(
        panel.gen_times().last().copied().flatten(),
        Some("2024-03-01T09:30:00".parse().unwrap())
    );
}

#[test]
fn return_panel_drops_live_spliced_terminal_row() {
    let now: NaiveDateTime = "2024-03-01T10:00:00".parse().unwrap();
    let recipe = PanelRecipe {
        gap_policy: GapPolicy::None,
        session_offset: SessionOffset::SessionOpen,
        return_lookahead: 1,
        live_splice: true,
    };
    let live = FixedLive(vec![LiveQuote {
        instrument: "600000.XSHG".to_string(),
        value: 12.1,
    }]);
    let panel = build_panel(
        &recipe,
        &calendar(),
        &open_prices(),
        Some(&live),
        d("2024-02-20"),
        d("2024-03-05"),
        now,
    )
    .unwrap();

    // Today's row is gone, but its price still feeds the 02-29 return.
    assert!(!panel.dates().contains(&d("2024-03-01")));
    let feb29 = panel.cell(d("2024-02-29"), "600000.XSHG").unwrap();
    assert!((feb29 - (12.1 / 11.0 - 1.0)).abs() < 1e-12);
    // And that return's generation time is today's open, not the anchor's.
    let idx = panel.dates().iter().position(|x| *x == d("2024-02-29")).unwrap();
    assert_eq!(
        panel.gen_times()[idx],
        Some("2024-03-01T09:30:00".parse().unwrap())
    );
}

#[test]
fn calendar_mismatch_rows_are_dropped_silently() {
    let recipe = PanelRecipe::eod(SessionOffset::SessionClose);
    let panel = build_panel(
        &recipe,
        &calendar(),
        &open_prices(),
        None,
        d("2024-02-20"),
        d("2024-03-05"),
        past_now(),
    )
    .unwrap();
    assert!(!panel.dates().contains(&d("2024-02-24")));
}

#[test]
fn start_after_end_is_an_error() {
    let recipe = PanelRecipe::eod(SessionOffset::Midnight);
    let err = build_panel(
        &recipe,
        &calendar(),
        &open_prices(),
        None,
        d("2024-03-05"),
        d("2024-02-20"),
        past_now(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        hobart_engine::EngineError::InvalidDateRange { .. }
    ));
}
