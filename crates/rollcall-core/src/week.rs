//! Calendar-week boundaries.
//!
//! A week runs from Sunday 00:00 to the following Sunday 00:00 in the time
//! zone of the instant it is computed from. [`week_start`] is the only place
//! that boundary is derived; read and write paths obtain "now" from an
//! injected [`Clock`] and pass it through here.

use chrono::{
  DateTime, Datelike, Duration, Local, NaiveTime, TimeZone, Utc,
};

/// Midnight of the most recent Sunday (the same day when `now` is a Sunday),
/// in `now`'s time zone.
///
/// If that midnight does not exist locally (a DST gap), the first valid
/// instant on that Sunday is returned instead.
pub fn week_start<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
  let tz = now.timezone();
  let today = now.date_naive();
  let back = u64::from(now.weekday().num_days_from_sunday());
  let sunday = today
    .checked_sub_days(chrono::Days::new(back))
    .unwrap_or(today);
  let midnight = sunday.and_time(NaiveTime::MIN);

  (0..24)
    .find_map(|h| {
      tz.from_local_datetime(&(midnight + Duration::hours(h)))
        .earliest()
    })
    .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
}

// ─── Clock ───────────────────────────────────────────────────────────────────

/// Source of "now" in server-local time.
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Local>;

  /// Start of the current week as a UTC instant, ready for storage queries.
  fn week_start(&self) -> DateTime<Utc> {
    week_start(&self.now()).with_timezone(&Utc)
  }
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Local> { Local::now() }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl FixedClock {
  pub fn at(instant: DateTime<Utc>) -> Self { Self(instant.with_timezone(&Local)) }
}

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Local> { self.0 }
}
