//! Free-form journal entry record.
//!
//! # Invariants
//! - `section_id = None` marks a free-floating entry.
//! - `section_id` is a weak reference; no store-level foreign key exists.
//! - `position` orders entries within the same `section_id` group.

use super::section::SectionId;
use serde::{Deserialize, Serialize};

/// Entry rowid.
pub type EntryId = i64;

/// Persisted entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    /// Short headline shown on the index.
    pub title: String,
    /// Full editable content.
    pub body: String,
    pub section_id: Option<SectionId>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Manual sort key within `section_id`'s group.
    pub position: i64,
}

impl Entry {
    /// Whether this entry belongs to no section.
    pub fn is_free_floating(&self) -> bool {
        self.section_id.is_none()
    }
}

/// Insert shape for an entry. Blank title and body are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEntry {
    pub title: String,
    pub body: String,
    pub section_id: Option<SectionId>,
}

impl NewEntry {
    /// An empty entry, optionally placed inside `section_id`.
    pub fn blank(section_id: Option<SectionId>) -> Self {
        Self {
            section_id,
            ..Self::default()
        }
    }
}
