//! Week boundary computation.
//!
//! Weeks start on Monday. There is no configuration for the first day of the
//! week.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};

/// The Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
  let offset = u64::from(date.weekday().num_days_from_monday());
  // Subtracting at most six days from a valid date only fails at the very
  // start of chrono's range, where the date itself is the best answer.
  date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// The first instant (UTC midnight) of `week_start`, used as the lower bound
/// when fetching a week's entries.
pub fn week_start_instant(week_start: NaiveDate) -> DateTime<Utc> {
  week_start.and_time(NaiveTime::MIN).and_utc()
}
