//! Policy-driven resolution of missing cells.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::align::PanelAligner;
use crate::panel::Panel;

/// How missing cells are resolved. Policies are mutually exclusive and never
/// drop instrument columns; only rows are ever dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPolicy {
    /// Leave missing cells missing — absence itself carries meaning
    /// (e.g. index membership).
    None,
    /// Fill missing with 0, then map every nonzero cell to 1. The order
    /// matters: fill first, threshold second, so a fetched 0 and a filled 0
    /// are indistinguishable and everything else collapses to 1.
    ZeroThenBinary,
    /// Propagate each instrument's last observation forward in ascending
    /// calendar-date order. Rows before the first observation stay missing.
    ForwardFill,
    /// Forward-fill, then drop rows outside the reconciled trading-date set.
    /// Used when the dense pre-fill frame carried synthetic scaffold dates.
    ForwardFillThenCalendarPrune,
}

/// Apply `policy` to the panel. `calendar` is the final reconciled
/// trading-date set; only the pruning policy consults it.
pub fn fill(panel: &mut Panel, policy: GapPolicy, calendar: &BTreeSet<NaiveDate>) {
    match policy {
        GapPolicy::None => {}
        GapPolicy::ZeroThenBinary => zero_then_binary(panel),
        GapPolicy::ForwardFill => forward_fill(panel),
        GapPolicy::ForwardFillThenCalendarPrune => {
            forward_fill(panel);
            PanelAligner::reconcile(panel, calendar);
        }
    }
}

fn forward_fill(panel: &mut Panel) {
    // Rows are kept in ascending date order by construction, so a plain
    // front-to-back sweep is fill-forward in calendar order.
    for column in panel.columns_mut() {
        let mut last = None;
        for cell in column.iter_mut() {
            match *cell {
                Some(v) => last = Some(v),
                None => *cell = last,
            }
        }
    }
}

fn zero_then_binary(panel: &mut Panel) {
    for column in panel.columns_mut() {
        for cell in column.iter_mut() {
            let v = cell.unwrap_or(0.0);
            *cell = Some(if v == 0.0 { 0.0 } else { 1.0 });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn panel_with(cells: &[Option<f64>]) -> Panel {
        let dates: Vec<NaiveDate> = (0..cells.len())
            .map(|i| d("2024-01-01") + chrono::Days::new(i as u64))
            .collect();
        let mut panel = Panel::empty_frame(dates.clone(), ["600000.XSHG".to_string()]);
        for (date, cell) in dates.iter().zip(cells) {
            if let Some(v) = cell {
                panel.set_cell(*date, "600000.XSHG", *v);
            }
        }
        panel
    }

    #[rstest]
    #[case(
        vec![Some(1.0), None, None, Some(5.0)],
        vec![Some(1.0), Some(1.0), Some(1.0), Some(5.0)]
    )]
    #[case(vec![None, None, Some(2.0), None], vec![None, None, Some(2.0), Some(2.0)])]
    fn test_forward_fill(#[case] input: Vec<Option<f64>>, #[case] expected: Vec<Option<f64>>) {
        let mut panel = panel_with(&input);
        fill(&mut panel, GapPolicy::ForwardFill, &BTreeSet::new());
        assert_eq!(panel.column("600000.XSHG").unwrap(), expected);
    }

    #[test]
    fn test_zero_then_binary() {
        let mut panel = panel_with(&[None, Some(3.2), None, Some(0.0)]);
        fill(&mut panel, GapPolicy::ZeroThenBinary, &BTreeSet::new());
        assert_eq!(
            panel.column("600000.XSHG").unwrap(),
            [Some(0.0), Some(1.0), Some(0.0), Some(0.0)]
        );
    }

    #[test]
    fn test_none_leaves_missing_cells() {
        let mut panel = panel_with(&[None, Some(1.0)]);
        fill(&mut panel, GapPolicy::None, &BTreeSet::new());
        assert_eq!(panel.column("600000.XSHG").unwrap(), [None, Some(1.0)]);
    }

    #[test]
    fn test_forward_fill_then_prune_drops_scaffold_rows() {
        let mut panel = panel_with(&[Some(1.0), None, None, None]);
        let calendar: BTreeSet<NaiveDate> = [d("2024-01-02"), d("2024-01-04")].into();
        fill(&mut panel, GapPolicy::ForwardFillThenCalendarPrune, &calendar);
        assert_eq!(panel.dates(), [d("2024-01-02"), d("2024-01-04")]);
        assert_eq!(
            panel.column("600000.XSHG").unwrap(),
            [Some(1.0), Some(1.0)]
        );
    }
}
