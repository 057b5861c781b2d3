//! The generic panel builder every factor runs through.
//!
//! Per-factor differences — which series to fetch, which gap policy, which
//! generation-time offset, whether to splice a live value, whether to derive
//! a forward return — live in a small declarative [`PanelRecipe`] instead of
//! copy-pasted control flow.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::align::PanelAligner;
use crate::error::{EngineError, Result};
use crate::fill::{self, GapPolicy};
use crate::gen_time;
use crate::panel::Panel;
use crate::returns;
use crate::session::SessionOffset;
use crate::sources::{CalendarService, LiveSnapshotSource, RawSeriesFetcher};
use crate::splice;

/// Declarative description of one factor's panel pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelRecipe {
    /// Missing-cell resolution policy.
    pub gap_policy: GapPolicy,
    /// Generation-time offset per row.
    pub session_offset: SessionOffset,
    /// Forward-return lookahead in trading days; 0 means values are emitted
    /// as fetched.
    pub return_lookahead: usize,
    /// Whether to splice a live intraday row for "today" when eligible.
    pub live_splice: bool,
}

impl PanelRecipe {
    /// Plain end-of-day values: no fill, no return, stamped at session close.
    pub const fn eod(offset: SessionOffset) -> Self {
        Self {
            gap_policy: GapPolicy::None,
            session_offset: offset,
            return_lookahead: 0,
            live_splice: false,
        }
    }
}

/// Build one panel: fetch, align, optionally splice, fill, derive returns,
/// stamp generation times.
///
/// Synchronous and stateless; nothing is cached across calls and no retry is
/// attempted. `now` is the single per-run clock capture — it drives both the
/// splice eligibility check and the spliced row's date label, so it must be
/// read exactly once by the caller.
pub fn build_panel(
    recipe: &PanelRecipe,
    calendar: &dyn CalendarService,
    raw: &dyn RawSeriesFetcher,
    live: Option<&dyn LiveSnapshotSource>,
    start: NaiveDate,
    end: NaiveDate,
    now: NaiveDateTime,
) -> Result<Panel> {
    if start > end {
        return Err(EngineError::InvalidDateRange { start, end });
    }

    let mut valid_dates: BTreeSet<NaiveDate> =
        calendar.trading_dates(start, end)?.into_iter().collect();
    let universe = raw.universe(start, end)?;
    let observations = raw.fetch(start, end)?;

    // The prune policy forward-fills across calendar dates the provider never
    // emitted, so those dates must already be on the dense axis.
    let scaffold = if recipe.gap_policy == GapPolicy::ForwardFillThenCalendarPrune {
        valid_dates.clone()
    } else {
        BTreeSet::new()
    };

    let mut panel = PanelAligner::dense(&observations, &universe, &scaffold, (start, end))?;

    let mut spliced: Option<NaiveDate> = None;
    if recipe.live_splice {
        if let Some(live) = live {
            spliced = splice::maybe_splice(&mut panel, live, now, end)?;
            if let Some(today) = spliced {
                // The calendar fetch may predate "now"; the spliced date is
                // calendar-valid by provenance.
                valid_dates.insert(today);
            }
        }
    }

    match recipe.gap_policy {
        // Fill first across the scaffold, then let the fill's own prune
        // reconcile against the calendar.
        GapPolicy::ForwardFillThenCalendarPrune => {
            fill::fill(&mut panel, recipe.gap_policy, &valid_dates);
        }
        _ => {
            PanelAligner::reconcile(&mut panel, &valid_dates);
            fill::fill(&mut panel, recipe.gap_policy, &valid_dates);
        }
    }

    gen_time::assign(&mut panel, recipe.session_offset);
    if recipe.return_lookahead > 0 {
        returns::shift_return(&mut panel, recipe.return_lookahead, spliced);
    }

    Ok(panel)
}
