//! Dated task record.
//!
//! # Invariants
//! - `due_date` is the epoch-ms instant of local midnight of the due day.
//! - The due day lies within the supported calendar years, give or take one
//!   day of zone offset.
//! - Tasks are append-only; there is no delete path.

use super::ValidationError;
use crate::calendar::{local_date_of, local_midnight_ms, max_supported_date, min_supported_date};
use chrono::{NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Task rowid.
pub type TaskId = i64;

/// Persisted task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    /// Unix epoch milliseconds, local midnight of the due day.
    pub due_date: i64,
}

/// Insert shape for a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub due_date: i64,
}

impl NewTask {
    /// Creates a task due on `date`, normalized to local midnight in `tz`.
    pub fn due_on<Tz: TimeZone>(name: impl Into<String>, date: NaiveDate, tz: &Tz) -> Self {
        Self {
            name: name.into(),
            due_date: local_midnight_ms(date, tz),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankTaskName);
        }
        if !due_instant_supported(self.due_date) {
            return Err(ValidationError::DueDateOutOfRange);
        }
        Ok(())
    }
}

// The UTC date may differ from the local due day by one day either way.
fn due_instant_supported(due_ms: i64) -> bool {
    let Some(utc_date) = local_date_of(due_ms, &Utc) else {
        return false;
    };
    let lowest = min_supported_date().pred_opt().unwrap_or(NaiveDate::MIN);
    let highest = max_supported_date().succ_opt().unwrap_or(NaiveDate::MAX);
    (lowest..=highest).contains(&utc_date)
}
