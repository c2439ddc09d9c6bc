//! Calendar arithmetic for the journal views.
//!
//! # Responsibility
//! - Sunday-anchored week ranges, labels and week tokens (`week`).
//! - Local-midnight epoch-ms windows for task queries (`window`).
//!
//! # Invariants
//! - Everything here is pure; no storage or clock access.

pub mod week;
pub mod window;

pub use week::{
    current_week_range, date_from_epoch_day, days_in_week, epoch_day, format_day_title,
    format_week_label, four_week_ranges, is_supported_date, max_supported_date,
    min_supported_date, past_week_ranges, week_range_from_epoch_day, week_start_epoch_day,
    WeekRange,
};
pub use window::{
    day_window, future_log_start_ms, local_date_of, local_midnight_ms, week_window, DayWindow,
};
