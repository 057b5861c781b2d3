//! Compact panel summaries for reporting.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use hobart_engine::Panel;

/// Shape and coverage of one generated panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSummary {
    /// Number of rows (trading dates).
    pub rows: usize,
    /// Number of instrument columns.
    pub instruments: usize,
    /// First row date, if any rows exist.
    pub first_date: Option<NaiveDate>,
    /// Last row date, if any rows exist.
    pub last_date: Option<NaiveDate>,
    /// Share of instrument cells that are missing, in `[0, 1]`.
    pub missing_share: f64,
}

impl PanelSummary {
    /// Summarize a panel.
    pub fn of(panel: &Panel) -> Self {
        Self {
            rows: panel.n_rows(),
            instruments: panel.instruments().len(),
            first_date: panel.dates().first().copied(),
            last_date: panel.dates().last().copied(),
            missing_share: panel.missing_share(),
        }
    }
}

impl std::fmt::Display for PanelSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.first_date, self.last_date) {
            (Some(first), Some(last)) => write!(
                f,
                "{} rows × {} instruments, {first} → {last}, {:.1}% missing",
                self.rows,
                self.instruments,
                self.missing_share * 100.0
            ),
            _ => write!(f, "empty panel ({} instruments)", self.instruments),
        }
    }
}
