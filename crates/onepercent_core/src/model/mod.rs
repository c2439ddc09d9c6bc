//! Journal domain records.
//!
//! # Responsibility
//! - Define the persisted shapes for tasks, entries and sections.
//! - Validate user-supplied fields before they reach storage.
//!
//! # Invariants
//! - Identifiers are SQLite rowids assigned on insert and never reused.
//! - `position` orders rows within one group; it is not required to be dense.

pub mod entry;
pub mod section;
pub mod task;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field-level validation failure for journal records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Task name is blank after trim.
    BlankTaskName,
    /// Section name is blank after trim.
    BlankSectionName,
    /// Task due instant falls outside the supported calendar years.
    DueDateOutOfRange,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTaskName => write!(f, "task name must not be blank"),
            Self::BlankSectionName => write!(f, "section name must not be blank"),
            Self::DueDateOutOfRange => write!(f, "task due date is outside the supported range"),
        }
    }
}

impl Error for ValidationError {}
