//! Index screen: week navigation plus sections and their entries.
//!
//! # Responsibility
//! - Derive past and current week ranges for the drawer.
//! - Group entries under their sections and collect free-floating ones.
//! - Route index actions (create, delete, move, reorder) to repositories.
//!
//! # Invariants
//! - `current_weeks` always has 4 items starting with `today`'s week.
//! - `past_weeks` ends the day before the current week's Sunday and never
//!   starts before the first supported year.
//! - An entry with no section appears only in `unassigned`; an entry whose
//!   section id matches no listed section appears nowhere.

use crate::calendar::{
    current_week_range, four_week_ranges, local_date_of, min_supported_date, past_week_ranges,
    WeekRange,
};
use crate::live::{ChangeHub, LiveQuery, Table};
use crate::model::entry::{Entry, EntryId, NewEntry};
use crate::model::section::{Section, SectionId};
use crate::repo::entry_repo::EntryRepository;
use crate::repo::section_repo::SectionRepository;
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoResult;
use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A section with its entries in position order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionWithEntries {
    pub section: Section,
    pub entries: Vec<Entry>,
}

/// Index screen state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexView {
    pub past_weeks: Vec<WeekRange>,
    pub current_weeks: Vec<WeekRange>,
    pub sections: Vec<SectionWithEntries>,
    pub unassigned: Vec<Entry>,
}

/// Builds the index state from raw reads.
///
/// `entries` are expected in position order; grouping preserves it.
pub fn build_index_view<Tz: TimeZone>(
    earliest_due_ms: Option<i64>,
    sections: Vec<Section>,
    entries: Vec<Entry>,
    today: NaiveDate,
    tz: &Tz,
) -> IndexView {
    let current_sunday = current_week_range(today).sunday;
    let past_weeks = earliest_due_ms
        .and_then(|ms| local_date_of(ms, tz))
        .map(|earliest| past_week_ranges(earliest.max(min_supported_date()), current_sunday))
        .unwrap_or_default();

    let mut by_section: HashMap<Option<SectionId>, Vec<Entry>> = HashMap::new();
    for entry in entries {
        by_section.entry(entry.section_id).or_default().push(entry);
    }

    let sections = sections
        .into_iter()
        .map(|section| SectionWithEntries {
            entries: by_section.remove(&Some(section.id)).unwrap_or_default(),
            section,
        })
        .collect();

    IndexView {
        past_weeks,
        current_weeks: four_week_ranges(today),
        sections,
        unassigned: by_section.remove(&None).unwrap_or_default(),
    }
}

pub struct IndexService<T, E, S>
where
    T: TaskRepository,
    E: EntryRepository,
    S: SectionRepository,
{
    tasks: T,
    entries: E,
    sections: S,
}

impl<T, E, S> IndexService<T, E, S>
where
    T: TaskRepository,
    E: EntryRepository,
    S: SectionRepository,
{
    pub fn new(tasks: T, entries: E, sections: S) -> Self {
        Self {
            tasks,
            entries,
            sections,
        }
    }

    /// Current index state as of `today` in `tz`.
    pub fn index_view<Tz: TimeZone>(&self, today: NaiveDate, tz: &Tz) -> RepoResult<IndexView> {
        let earliest = self.tasks.earliest_due_date()?;
        let sections = self.sections.list_sections()?;
        let entries = self.entries.list_entries()?;
        Ok(build_index_view(earliest, sections, entries, today, tz))
    }

    pub fn watch<'a, Tz: TimeZone + 'a>(
        &'a self,
        hub: &ChangeHub,
        today: NaiveDate,
        tz: Tz,
    ) -> LiveQuery<'a, IndexView> {
        LiveQuery::new(
            hub,
            &[Table::Tasks, Table::Entries, Table::Sections],
            move || self.index_view(today, &tz),
        )
    }

    /// Creates an empty entry, optionally inside `section_id`.
    pub fn create_entry(&self, section_id: Option<SectionId>) -> RepoResult<EntryId> {
        self.entries.add_entry(&NewEntry::blank(section_id))
    }

    pub fn create_section(&self, name: &str) -> RepoResult<SectionId> {
        self.sections.add_section(name)
    }

    pub fn delete_entry(&self, id: EntryId) -> RepoResult<()> {
        self.entries.delete_entry(id)
    }

    /// Deletes a section; its entries become free-floating.
    pub fn delete_section(&self, id: SectionId) -> RepoResult<()> {
        self.sections.delete_section(id)
    }

    pub fn move_entry(&self, id: EntryId, section_id: Option<SectionId>) -> RepoResult<()> {
        self.entries.move_entry(id, section_id)
    }

    pub fn reorder_entries(&self, ids: &[EntryId]) -> RepoResult<()> {
        self.entries.reorder_entries(ids)
    }

    pub fn reorder_sections(&self, ids: &[SectionId]) -> RepoResult<()> {
        self.sections.reorder_sections(ids)
    }

    pub fn search_entries(&self, query: &str) -> RepoResult<Vec<Entry>> {
        self.entries.search_entries(query)
    }
}

#[cfg(test)]
mod tests {
    use super::build_index_view;
    use crate::calendar::local_midnight_ms;
    use crate::model::entry::Entry;
    use crate::model::section::Section;
    use chrono::{NaiveDate, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn section(id: i64, position: i64) -> Section {
        Section {
            id,
            name: format!("section {id}"),
            created_at: 0,
            position,
        }
    }

    fn entry(id: i64, section_id: Option<i64>) -> Entry {
        Entry {
            id,
            title: String::new(),
            body: String::new(),
            section_id,
            created_at: 0,
            position: 0,
        }
    }

    #[test]
    fn free_floating_entries_only_appear_unassigned() {
        let view = build_index_view(
            None,
            vec![section(1, 0), section(2, 1)],
            vec![entry(10, Some(2)), entry(11, None), entry(12, Some(1))],
            date(2026, 2, 25),
            &Utc,
        );
        assert_eq!(view.sections[0].entries[0].id, 12);
        assert_eq!(view.sections[1].entries[0].id, 10);
        assert_eq!(view.unassigned.len(), 1);
        assert!(view.unassigned[0].is_free_floating());
        assert!(view
            .sections
            .iter()
            .flat_map(|group| group.entries.iter())
            .all(|entry| !entry.is_free_floating()));
    }

    #[test]
    fn entries_of_unknown_sections_are_not_shown() {
        let view = build_index_view(
            None,
            vec![section(1, 0)],
            vec![entry(10, Some(99))],
            date(2026, 2, 25),
            &Utc,
        );
        assert!(view.sections[0].entries.is_empty());
        assert!(view.unassigned.is_empty());
    }

    #[test]
    fn past_weeks_start_at_earliest_task_week() {
        let earliest = local_midnight_ms(date(2026, 1, 28), &Utc);
        let view = build_index_view(
            Some(earliest),
            Vec::new(),
            Vec::new(),
            date(2026, 2, 25),
            &Utc,
        );
        let sundays: Vec<NaiveDate> = view.past_weeks.iter().map(|w| w.sunday).collect();
        assert_eq!(
            sundays,
            vec![date(2026, 1, 25), date(2026, 2, 1), date(2026, 2, 8), date(2026, 2, 15)]
        );
    }

    #[test]
    fn past_weeks_are_bounded_by_the_first_supported_year() {
        let ancient = local_midnight_ms(date(-200_000, 3, 1), &Utc);
        let view = build_index_view(Some(ancient), Vec::new(), Vec::new(), date(2026, 2, 25), &Utc);
        assert_eq!(view.past_weeks[0].sunday, date(1899, 12, 31));
        assert_eq!(view.past_weeks.last().map(|w| w.sunday), Some(date(2026, 2, 15)));
        assert!(view.past_weeks.len() < 7_000);
    }
}
