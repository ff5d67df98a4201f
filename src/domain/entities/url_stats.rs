//! Daily hit counter entity.

use chrono::{DateTime, Duration, Local, NaiveDate, Timelike, Utc};

/// Number of days covered by the stats histogram.
pub const HISTOGRAM_DAYS: i64 = 7;

/// Redirect count for one URL on one day.
///
/// Rows are keyed by `(url_id, date)`; `date` is the local calendar day of the
/// redirects it counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlStats {
    pub id: i64,
    pub url_id: i64,
    pub date: NaiveDate,
    pub hits: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Earliest day bucket inside the histogram window ending at `now`.
///
/// A bucket belongs to the window when its local midnight is at or after
/// `now - 7 days`. Outside of exact midnights that is the following day, so the
/// window holds seven buckets including today.
pub fn histogram_start(now: DateTime<Local>) -> NaiveDate {
    let threshold = now - Duration::days(HISTOGRAM_DAYS);
    let day = threshold.date_naive();

    if threshold.num_seconds_from_midnight() == 0 && threshold.nanosecond() == 0 {
        day
    } else {
        day.succ_opt().unwrap_or(day)
    }
}
