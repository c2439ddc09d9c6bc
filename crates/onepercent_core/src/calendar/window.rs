//! Local-day epoch-millisecond windows used as task query boundaries.
//!
//! # Responsibility
//! - Convert calendar dates to local-midnight instants in a given zone.
//! - Derive the half-open windows used by today/week/future-log queries.
//!
//! # Invariants
//! - A window is `[start_ms, end_ms)`: start inclusive, end exclusive.
//! - Task due dates are stored as local midnight of the chosen day, so a
//!   day window contains exactly the tasks due on that day.

use super::week::{four_week_ranges, WeekRange};
use chrono::{Duration, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Longest DST gap we step over when midnight does not exist locally.
const MAX_MIDNIGHT_GAP_MINUTES: i64 = 180;

/// Half-open epoch-millisecond interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl DayWindow {
    /// Whether `instant_ms` falls within `[start_ms, end_ms)`.
    pub fn contains(&self, instant_ms: i64) -> bool {
        self.start_ms <= instant_ms && instant_ms < self.end_ms
    }
}

/// Epoch milliseconds of the first instant of `date` in `tz`.
///
/// In zones where midnight is skipped by a DST transition, this returns the
/// first local instant after the gap.
pub fn local_midnight_ms<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> i64 {
    let midnight = date.and_time(NaiveTime::default());
    let mut minutes = 0;
    while minutes <= MAX_MIDNIGHT_GAP_MINUTES {
        let Some(candidate) = midnight.checked_add_signed(Duration::minutes(minutes)) else {
            break;
        };
        if let Some(instant) = tz.from_local_datetime(&candidate).earliest() {
            return instant.timestamp_millis();
        }
        minutes += 1;
    }
    // No zone has a gap this wide; treat the wall clock as UTC.
    midnight.and_utc().timestamp_millis()
}

/// Window covering `date` in `tz`.
pub fn day_window<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DayWindow {
    DayWindow {
        start_ms: local_midnight_ms(date, tz),
        end_ms: midnight_after_ms(date, tz),
    }
}

/// Window covering Sunday through Saturday of `range` in `tz`.
pub fn week_window<Tz: TimeZone>(range: WeekRange, tz: &Tz) -> DayWindow {
    DayWindow {
        start_ms: local_midnight_ms(range.sunday, tz),
        end_ms: midnight_after_ms(range.saturday, tz),
    }
}

/// Cut-off for the future log: midnight of the Sunday right after the
/// four-week window that starts with `today`'s week.
pub fn future_log_start_ms<Tz: TimeZone>(today: NaiveDate, tz: &Tz) -> i64 {
    let ranges = four_week_ranges(today);
    let last_saturday = ranges
        .last()
        .map(|range| range.saturday)
        .unwrap_or(today);
    midnight_after_ms(last_saturday, tz)
}

/// Midnight ending `date`; `i64::MAX` after the last representable day.
fn midnight_after_ms<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> i64 {
    date.succ_opt()
        .map_or(i64::MAX, |next| local_midnight_ms(next, tz))
}

/// Calendar date of `instant_ms` as observed in `tz`.
///
/// Returns `None` only for instants outside chrono's representable range.
pub fn local_date_of<Tz: TimeZone>(instant_ms: i64, tz: &Tz) -> Option<NaiveDate> {
    tz.timestamp_millis_opt(instant_ms)
        .single()
        .map(|instant| instant.date_naive())
}
