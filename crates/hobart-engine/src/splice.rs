//! Live splice: inserting an intraday partial row for "today".

use chrono::{NaiveDate, NaiveDateTime};
use log::debug;

use crate::error::Result;
use crate::panel::Panel;
use crate::session::is_session_open;
use crate::sources::LiveSnapshotSource;

/// Splice an intraday snapshot into `panel` if the window covers "now" and
/// the session is open.
///
/// `now` must be the single per-run capture; it decides eligibility *and*
/// labels the inserted row, so a second clock read near midnight or a session
/// boundary can never disagree with it.
///
/// Returns the spliced date when applied. The caller must treat that date as
/// calendar-valid during reconciliation — the calendar fetch may predate
/// "now" and not contain it.
pub fn maybe_splice(
    panel: &mut Panel,
    live: &dyn LiveSnapshotSource,
    now: NaiveDateTime,
    end: NaiveDate,
) -> Result<Option<NaiveDate>> {
    let today = now.date();
    if end < today || !is_session_open(now) {
        return Ok(None);
    }

    let quotes = live.snapshot(panel.instruments())?;
    if quotes.is_empty() {
        return Ok(None);
    }

    panel.upsert_row(today);
    for quote in &quotes {
        panel.set_cell(today, &quote.instrument, quote.value);
    }
    debug!(
        "live splice: {} quotes written for {today}",
        quotes.len()
    );
    Ok(Some(today))
}
