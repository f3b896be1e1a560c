use chrono::NaiveDate;

use crate::stats::StatsMap;

/// Default window, in days, within which a repeat asks for confirmation.
pub const DEFAULT_THRESHOLD_DAYS: i64 = 30;

/// Outcome of a recency check. `days_since` and `last_date` are filled in
/// whenever the song has been sung before, blocked or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecencyCheck {
    pub blocked: bool,
    pub days_since: Option<i64>,
    pub last_date: Option<NaiveDate>,
}

/// Was `song` sung within `threshold_days` of `today`?
///
/// Works on calendar dates, so there is no time-of-day or daylight-saving
/// drift. Advisory only: callers may add the song anyway.
pub fn check(song: &str, stats: &StatsMap, today: NaiveDate, threshold_days: i64) -> RecencyCheck {
    let Some(last_date) = stats.get(song).and_then(|s| s.last_date) else {
        return RecencyCheck::default();
    };

    let days_since = (today - last_date).num_days().abs();
    RecencyCheck {
        blocked: days_since <= threshold_days,
        days_since: Some(days_since),
        last_date: Some(last_date),
    }
}
