//! Session clock: generation-time offsets and the live-splice window check.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Fixed offset added to a row date to form its generation time.
///
/// Chosen per factor semantics: open-price-derived factors stamp at session
/// open, close/membership/risk factors at session close or midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOffset {
    /// 09:30 — the market open.
    SessionOpen,
    /// 15:00 — the market close.
    SessionClose,
    /// 00:00 — start of day.
    Midnight,
}

impl SessionOffset {
    /// The clock time this offset stamps onto a date.
    pub const fn time(self) -> NaiveTime {
        match self {
            Self::SessionOpen => MORNING_OPEN,
            Self::SessionClose => AFTERNOON_CLOSE,
            Self::Midnight => NaiveTime::MIN,
        }
    }

    /// Generation time for a row dated `date`.
    pub const fn stamp(self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.time())
    }
}

/// Morning session open.
pub const MORNING_OPEN: NaiveTime = match NaiveTime::from_hms_opt(9, 30, 0) {
    Some(t) => t,
    None => unreachable!(),
};
/// Morning session close.
pub const MORNING_CLOSE: NaiveTime = match NaiveTime::from_hms_opt(11, 30, 0) {
    Some(t) => t,
    None => unreachable!(),
};
/// Afternoon session open.
pub const AFTERNOON_OPEN: NaiveTime = match NaiveTime::from_hms_opt(13, 0, 0) {
    Some(t) => t,
    None => unreachable!(),
};
/// Afternoon session close.
pub const AFTERNOON_CLOSE: NaiveTime = match NaiveTime::from_hms_opt(15, 0, 0) {
    Some(t) => t,
    None => unreachable!(),
};

/// Whether `now` falls inside a trading session.
///
/// Fixed clock windows 09:30–11:30 and 13:00–15:00, Monday through Friday.
/// No holiday calendar is consulted, so a holiday weekday at 10:00 still
/// counts as open; the splice that follows simply finds no quotes then.
pub fn is_session_open(now: NaiveDateTime) -> bool {
    let weekday = matches!(
        now.weekday(),
        Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu | Weekday::Fri
    );
    let t = now.time();
    weekday
        && ((MORNING_OPEN <= t && t <= MORNING_CLOSE)
            || (AFTERNOON_OPEN <= t && t <= AFTERNOON_CLOSE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn at(date: &str, h: u32, m: u32) -> NaiveDateTime {
        date.parse::<NaiveDate>()
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    #[rstest]
    // 2024-03-01 is a Friday.
    #[case(at("2024-03-01", 10, 0), true)]
    #[case(at("2024-03-01", 9, 30), true)]
    #[case(at("2024-03-01", 11, 30), true)]
    #[case(at("2024-03-01", 12, 0), false)]
    #[case(at("2024-03-01", 13, 0), true)]
    #[case(at("2024-03-01", 15, 0), true)]
    #[case(at("2024-03-01", 15, 1), false)]
    #[case(at("2024-03-01", 9, 29), false)]
    // 2024-03-02 is a Saturday.
    #[case(at("2024-03-02", 10, 0), false)]
    fn test_session_windows(#[case] now: NaiveDateTime, #[case] open: bool) {
        assert_eq!(is_session_open(now), open);
    }

    #[test]
    fn test_offsets_stamp_expected_times() {
        let d: NaiveDate = "2024-03-01".parse().unwrap();
        assert_eq!(SessionOffset::SessionOpen.stamp(d), at("2024-03-01", 9, 30));
        assert_eq!(SessionOffset::SessionClose.stamp(d), at("2024-03-01", 15, 0));
        assert_eq!(SessionOffset::Midnight.stamp(d), at("2024-03-01", 0, 0));
    }
}
