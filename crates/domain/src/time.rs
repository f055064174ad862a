//! Time and timestamp helpers.
//!
//! Every day-boundary computation in verdant uses the UTC calendar day, never
//! the server's local time zone.

use chrono::{DateTime, Duration, NaiveTime, Utc};

/// UTC timestamp used for planting dates, record times, task dates, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Half-open UTC calendar day `[start, end)` containing a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl DayWindow {
    /// The UTC day that contains `ts`.
    #[must_use]
    pub fn containing(ts: Timestamp) -> Self {
        let start = ts.date_naive().and_time(NaiveTime::MIN).and_utc();
        Self {
            start,
            end: start + Duration::days(1),
        }
    }

    /// Whether `ts` falls inside this day.
    #[must_use]
    pub fn contains(&self, ts: Timestamp) -> bool {
        ts >= self.start && ts < self.end
    }
}

/// Number of UTC calendar-day boundaries crossed between `from` and `to`.
///
/// Negative when `to` is on an earlier day than `from`.
#[must_use]
pub fn calendar_days_between(from: Timestamp, to: Timestamp) -> i64 {
    (to.date_naive() - from.date_naive()).num_days()
}

/// Whole elapsed days (truncated 24-hour periods) between `from` and `to`.
#[must_use]
pub fn whole_days_between(from: Timestamp, to: Timestamp) -> i64 {
    (to - from).num_days()
}
