//! Forward-return derivation via date shift.

use chrono::NaiveDate;

use crate::panel::Panel;

/// Replace each value column with its forward return over `lookahead` rows:
/// `v[t+lookahead] / v[t] - 1`, reported at row `t`.
///
/// The trailing `lookahead` rows become missing — there is no future value to
/// divide by. Generation times are shifted by the same lookahead: a forward
/// return anchored at `t` is only truthfully available at the *later* date's
/// stamp, which [`crate::gen_time::assign`] wrote before the shift.
///
/// `today` is the live-spliced date, if any. A forward return anchored today
/// cannot yet be known, so that row is dropped from the return panel rather
/// than emitted with a guaranteed-missing value.
pub fn shift_return(panel: &mut Panel, lookahead: usize, today: Option<NaiveDate>) {
    if lookahead == 0 {
        return;
    }
    let n = panel.n_rows();
    for column in panel.columns_mut() {
        for t in 0..n {
            column[t] = match (column[t], column.get(t + lookahead).copied().flatten()) {
                (Some(base), Some(future)) if base != 0.0 => Some(future / base - 1.0),
                _ => None,
            };
        }
    }
    panel.shift_gen_times(lookahead);

    if let Some(today) = today {
        if panel.dates().last() == Some(&today) {
            panel.retain_rows(|date| date != today);
        }
    }
}
