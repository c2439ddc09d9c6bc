//! User-defined grouping for entries.

use super::ValidationError;
use serde::{Deserialize, Serialize};

/// Section rowid.
pub type SectionId = i64;

/// Persisted section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub name: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Manual sort key among all sections.
    pub position: i64,
}

/// Normalizes a section name, rejecting blank input.
pub fn normalize_section_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankSectionName);
    }
    Ok(trimmed.to_string())
}
