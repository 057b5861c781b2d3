//! Projection of sparse observations onto a dense, calendar-reconciled frame.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use log::debug;

use crate::error::{EngineError, Result};
use crate::panel::Panel;
use crate::sources::RawObservation;

/// Builds dense panels from sparse raw series.
#[derive(Debug)]
pub struct PanelAligner;

impl PanelAligner {
    /// Build the dense frame over the date axis implied by the observations
    /// themselves, plus any scaffold dates the caller wants present (used by
    /// the forward-fill-then-prune policy, which fills across calendar dates
    /// the provider never emitted).
    ///
    /// Instruments with no data anywhere in range stay entirely missing;
    /// only a window where *no* instrument has data is an error.
    pub fn dense(
        observations: &[RawObservation],
        universe: &[String],
        scaffold: &BTreeSet<NaiveDate>,
        window: (NaiveDate, NaiveDate),
    ) -> Result<Panel> {
        if universe.is_empty() {
            return Err(EngineError::EmptyUniverse);
        }
        if observations.is_empty() {
            let (start, end) = window;
            return Err(EngineError::DataUnavailable { start, end });
        }

        let axis: BTreeSet<NaiveDate> = observations
            .iter()
            .map(|o| o.date)
            .chain(scaffold.iter().copied())
            .collect();

        let mut panel = Panel::empty_frame(axis, universe.iter().cloned());
        for obs in observations {
            panel.set_cell(obs.date, &obs.instrument, obs.value);
        }
        Ok(panel)
    }

    /// Drop every row whose date is not in the reconciled trading-date set.
    ///
    /// Provider dates outside the calendar are a normal occurrence and are
    /// removed silently; nothing else about the panel changes.
    pub fn reconcile(panel: &mut Panel, valid_dates: &BTreeSet<NaiveDate>) {
        let before = panel.n_rows();
        panel.retain_rows(|date| valid_dates.contains(&date));
        let dropped = before - panel.n_rows();
        if dropped > 0 {
            debug!("reconcile: dropped {dropped} non-calendar rows");
        }
    }

    /// Dense projection followed by calendar reconciliation, for pipelines
    /// without a live splice or scaffold dates.
    pub fn align(
        observations: &[RawObservation],
        calendar: &BTreeSet<NaiveDate>,
        universe: &[String],
        window: (NaiveDate, NaiveDate),
    ) -> Result<Panel> {
        let mut panel = Self::dense(observations, universe, &BTreeSet::new(), window)?;
        Self::reconcile(&mut panel, calendar);
        Ok(panel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn obs(code: &str, date: &str, value: f64) -> RawObservation {
        RawObservation::new(code, d(date), value)
    }

    fn window() -> (NaiveDate, NaiveDate) {
        (d("2024-01-01"), d("2024-01-31"))
    }

    #[test]
    fn test_axis_comes_from_observations() {
        let universe = vec!["600000.XSHG".to_string(), "000001.XSHE".to_string()];
        let observations = vec![
            obs("600000.XSHG", "2024-01-03", 10.0),
            obs("600000.XSHG", "2024-01-02", 9.5),
        ];
        let panel =
            PanelAligner::dense(&observations, &universe, &BTreeSet::new(), window()).unwrap();
        assert_eq!(panel.dates(), [d("2024-01-02"), d("2024-01-03")]);
        assert_eq!(panel.cell(d("2024-01-02"), "600000.XSHG"), Some(9.5));
        // Declared but data-free instrument is still a column.
        assert_eq!(panel.column("000001.XSHE").unwrap(), [None, None]);
    }

    #[test]
    fn test_no_data_at_all_is_unavailable() {
        let universe = vec!["600000.XSHG".to_string()];
        let err = PanelAligner::dense(&[], &universe, &BTreeSet::new(), window()).unwrap_err();
        assert!(matches!(err, EngineError::DataUnavailable { .. }));
    }

    #[test]
    fn test_empty_universe_is_fatal() {
        let observations = vec![obs("600000.XSHG", "2024-01-02", 1.0)];
        let err =
            PanelAligner::dense(&observations, &[], &BTreeSet::new(), window()).unwrap_err();
        assert!(matches!(err, EngineError::EmptyUniverse));
    }

    #[test]
    fn test_reconcile_drops_non_calendar_dates() {
        let universe = vec!["600000.XSHG".to_string()];
        let observations = vec![
            obs("600000.XSHG", "2024-01-02", 1.0),
            // A Saturday the provider emitted anyway.
            obs("600000.XSHG", "2024-01-06", 2.0),
            obs("600000.XSHG", "2024-01-08", 3.0),
        ];
        let calendar: BTreeSet<NaiveDate> = [d("2024-01-02"), d("2024-01-08")].into();
        let panel = PanelAligner::align(&observations, &calendar, &universe, window()).unwrap();
        assert_eq!(panel.dates(), [d("2024-01-02"), d("2024-01-08")]);
    }

    #[test]
    fn test_scaffold_dates_are_added_to_axis() {
        let universe = vec!["600000.XSHG".to_string()];
        let observations = vec![obs("600000.XSHG", "2024-01-02", 1.0)];
        let scaffold: BTreeSet<NaiveDate> = [d("2024-01-03"), d("2024-01-04")].into();
        let panel = PanelAligner::dense(&observations, &universe, &scaffold, window()).unwrap();
        assert_eq!(
            panel.dates(),
            [d("2024-01-02"), d("2024-01-03"), d("2024-01-04")]
        );
    }
}
