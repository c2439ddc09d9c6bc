//! Sunday-anchored week arithmetic and labels.
//!
//! # Responsibility
//! - Compute Sun-Sat week ranges for any calendar date.
//! - Encode a week identity as a stable integer token for routing.
//! - Produce the fixed label formats shown in the drawer and pager.
//! - Define the date range the journal accepts for new tasks.
//!
//! # Invariants
//! - `WeekRange::sunday` is always a Sunday.
//! - `WeekRange::saturday == sunday + 6 days`.
//! - All functions are total over the representable `NaiveDate` domain and
//!   never panic. Dates in the partial first or last week of chrono's
//!   calendar resolve to the nearest complete week.
//! - `week_range_from_epoch_day` rejects tokens outside the calendar.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Day count from `0001-01-01` (CE day 1) to `1970-01-01`.
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;
const WEEK_LABEL_FORMAT: &str = "%a. %-m/%-d";
const DAY_TITLE_FORMAT: &str = "%A %-m/%-d";
const MIN_SUPPORTED_YEAR: i32 = 1900;
const MAX_SUPPORTED_YEAR: i32 = 2999;

/// A Sun-Sat week, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeekRange {
    pub sunday: NaiveDate,
    pub saturday: NaiveDate,
}

impl WeekRange {
    /// Builds the week starting at `sunday`. Caller guarantees it is a Sunday
    /// whose Saturday is representable.
    fn starting(sunday: NaiveDate) -> Self {
        Self {
            sunday,
            saturday: sunday
                .checked_add_signed(Duration::days(6))
                .unwrap_or(NaiveDate::MAX),
        }
    }

    /// Whether `date` falls within this week.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.sunday <= date && date <= self.saturday
    }

    /// Whether any day of the week is a supported task date.
    pub fn is_supported(&self) -> bool {
        self.saturday >= min_supported_date() && self.sunday <= max_supported_date()
    }

    /// The week immediately after this one; `None` past the last complete
    /// week of the calendar.
    pub fn next(&self) -> Option<Self> {
        let sunday = self.sunday.checked_add_signed(Duration::weeks(1))?;
        sunday.checked_add_signed(Duration::days(6))?;
        Some(Self::starting(sunday))
    }
}

/// Returns the week whose Sunday-Saturday span contains `date`.
///
/// A Sunday input is the start of its own week.
pub fn current_week_range(date: NaiveDate) -> WeekRange {
    WeekRange::starting(week_sunday(date))
}

/// Returns the current week followed by the three upcoming weeks.
///
/// Shorter only within the last three weeks of chrono's calendar.
pub fn four_week_ranges(date: NaiveDate) -> Vec<WeekRange> {
    let mut ranges = Vec::with_capacity(4);
    let mut next = Some(current_week_range(date));
    while let Some(range) = next {
        if ranges.len() == 4 {
            break;
        }
        ranges.push(range);
        next = range.next();
    }
    ranges
}

/// Days since `1970-01-01` of the Sunday starting `date`'s week.
pub fn week_start_epoch_day(date: NaiveDate) -> i64 {
    epoch_day(week_sunday(date))
}

/// Rebuilds a week from a Sunday's epoch day.
///
/// Inverse of [`week_start_epoch_day`]. A token that is not a Sunday resolves
/// to the week containing that day. Returns `None` when the token's week
/// does not lie wholly inside the calendar range chrono can represent.
pub fn week_range_from_epoch_day(epoch_day: i64) -> Option<WeekRange> {
    let date = date_from_epoch_day(epoch_day)?;
    full_week_sunday(date).map(WeekRange::starting)
}

/// The seven dates of `range`, Sunday through Saturday.
pub fn days_in_week(range: WeekRange) -> Vec<NaiveDate> {
    (0..7)
        .filter_map(|offset| range.sunday.checked_add_signed(Duration::days(offset)))
        .collect()
}

/// Every week from the one containing `earliest` up to, but excluding, the
/// week starting on `exclusive_end`.
///
/// `exclusive_end` is expected to be a Sunday (the start of the current
/// four-week window). Returns an empty list when `earliest`'s Sunday is on or
/// after `exclusive_end`. The list grows with the distance between the two
/// dates; callers bound `earliest` with [`min_supported_date`].
pub fn past_week_ranges(earliest: NaiveDate, exclusive_end: NaiveDate) -> Vec<WeekRange> {
    let mut ranges = Vec::new();
    let mut next = Some(current_week_range(earliest));
    while let Some(range) = next {
        if range.sunday >= exclusive_end {
            break;
        }
        ranges.push(range);
        next = range.next();
    }
    ranges
}

/// Sidebar label, e.g. `"Sun. 2/22 - Sat. 2/28"`.
pub fn format_week_label(range: WeekRange) -> String {
    format!(
        "{} - {}",
        range.sunday.format(WEEK_LABEL_FORMAT),
        range.saturday.format(WEEK_LABEL_FORMAT)
    )
}

/// Pager page title, e.g. `"Wednesday 2/25"`.
pub fn format_day_title(date: NaiveDate) -> String {
    date.format(DAY_TITLE_FORMAT).to_string()
}

/// Days since `1970-01-01` for `date` (negative before the epoch).
pub fn epoch_day(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE
}

/// Inverse of [`epoch_day`]; `None` outside chrono's calendar range.
pub fn date_from_epoch_day(epoch_day: i64) -> Option<NaiveDate> {
    let days_from_ce = i32::try_from(epoch_day.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?).ok()?;
    NaiveDate::from_num_days_from_ce_opt(days_from_ce)
}

/// First day a task may be due on (`1900-01-01`).
pub fn min_supported_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(MIN_SUPPORTED_YEAR, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Last day a task may be due on (`2999-12-31`).
pub fn max_supported_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(MAX_SUPPORTED_YEAR, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Whether `date` lies within the journal's supported task dates.
pub fn is_supported_date(date: NaiveDate) -> bool {
    min_supported_date() <= date && date <= max_supported_date()
}

/// Sunday of `date`'s week when that whole week is representable.
fn full_week_sunday(date: NaiveDate) -> Option<NaiveDate> {
    let offset = Duration::days(i64::from(date.weekday().num_days_from_sunday()));
    let sunday = date.checked_sub_signed(offset)?;
    sunday.checked_add_signed(Duration::days(6))?;
    Some(sunday)
}

/// Sunday of `date`'s week, clamped to the first or last complete week.
fn week_sunday(date: NaiveDate) -> NaiveDate {
    if let Some(sunday) = full_week_sunday(date) {
        return sunday;
    }
    if date.year() < 0 {
        first_full_week_sunday()
    } else {
        last_full_week_sunday()
    }
}

fn first_full_week_sunday() -> NaiveDate {
    let min = NaiveDate::MIN;
    let ahead = (7 - i64::from(min.weekday().num_days_from_sunday())) % 7;
    min.checked_add_signed(Duration::days(ahead)).unwrap_or(min)
}

fn last_full_week_sunday() -> NaiveDate {
    let max = NaiveDate::MAX;
    let back = i64::from(max.weekday().num_days_from_sunday());
    // MAX's own week is complete only when MAX is a Saturday.
    let back = if back == 6 { back } else { back + 7 };
    max.checked_sub_signed(Duration::days(back)).unwrap_or(max)
}
