//! Generation-time stamping.

use crate::panel::Panel;
use crate::session::SessionOffset;

/// Stamp every row with `row_date + offset`.
///
/// Because rows are ordered by date and the offset is fixed, the resulting
/// column is non-decreasing in row date. Return panels shift these stamps
/// afterwards, see [`crate::returns::shift_return`].
pub fn assign(panel: &mut Panel, offset: SessionOffset) {
    for row in 0..panel.n_rows() {
        let stamp = offset.stamp(panel.dates()[row]);
        panel.set_gen_time(row, Some(stamp));
    }
}
