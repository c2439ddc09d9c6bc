//! Entry repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD, grouping reads, search and manual reorder for entries.
//!
//! # Invariants
//! - Group reads order by `position ASC, id ASC`.
//! - `update_entry` writes title/body only; `section_id`, `created_at` and
//!   `position` are never overwritten by content edits.
//! - A free-floating entry (`section_id IS NULL`) is returned only by
//!   `unassigned_entries` and `list_entries`, never by `entries_for_section`.

use super::reindex::{next_entry_position, reindex, OrderedTable};
use super::{ensure_connection_ready, now_epoch_ms, RepoResult};
use crate::live::{ChangeHub, Table};
use crate::model::entry::{Entry, EntryId, NewEntry};
use crate::model::section::SectionId;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const ENTRY_SELECT_SQL: &str = "SELECT
    id,
    title,
    body,
    section_id,
    created_at,
    position
FROM entries";

/// Repository interface for entry operations.
pub trait EntryRepository {
    /// Inserts one entry at the end of its group and returns its id.
    fn add_entry(&self, entry: &NewEntry) -> RepoResult<EntryId>;
    /// Replaces title and body of one entry.
    fn update_entry(&self, id: EntryId, title: &str, body: &str) -> RepoResult<()>;
    /// Permanently removes one entry.
    fn delete_entry(&self, id: EntryId) -> RepoResult<()>;
    /// Loads one entry by id.
    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>>;
    /// All entries, every group, by position.
    fn list_entries(&self) -> RepoResult<Vec<Entry>>;
    /// Entries belonging to `section_id`.
    fn entries_for_section(&self, section_id: SectionId) -> RepoResult<Vec<Entry>>;
    /// Free-floating entries.
    fn unassigned_entries(&self) -> RepoResult<Vec<Entry>>;
    /// Reassigns one entry to `section_id` (`None` = free-floating), appending
    /// it to the end of the target group.
    fn move_entry(&self, id: EntryId, section_id: Option<SectionId>) -> RepoResult<()>;
    /// Entries whose title or body contains `query`, newest first.
    fn search_entries(&self, query: &str) -> RepoResult<Vec<Entry>>;
    /// Persists `ids[i].position = i` atomically.
    fn reorder_entries(&self, ids: &[EntryId]) -> RepoResult<()>;
}

/// SQLite-backed entry repository.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
    changes: &'conn ChangeHub,
}

impl<'conn> SqliteEntryRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection, changes: &'conn ChangeHub) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            "entries",
            &["id", "title", "body", "section_id", "created_at", "position"],
        )?;
        Ok(Self { conn, changes })
    }

    fn query_entries(&self, sql: &str, params: impl rusqlite::Params) -> RepoResult<Vec<Entry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let entries = stmt
            .query_map(params, parse_entry_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn add_entry(&self, entry: &NewEntry) -> RepoResult<EntryId> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let position = next_entry_position(&tx, entry.section_id)?;
        tx.execute(
            "INSERT INTO entries (title, body, section_id, created_at, position)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                entry.title.as_str(),
                entry.body.as_str(),
                entry.section_id,
                now_epoch_ms(),
                position,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        self.changes.notify(&[Table::Entries]);
        Ok(id)
    }

    fn update_entry(&self, id: EntryId, title: &str, body: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE entries SET title = ?2, body = ?3 WHERE id = ?1;",
            params![id, title, body],
        )?;
        if changed > 0 {
            self.changes.notify(&[Table::Entries]);
        }
        Ok(())
    }

    fn delete_entry(&self, id: EntryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM entries WHERE id = ?1;", [id])?;
        if changed > 0 {
            self.changes.notify(&[Table::Entries]);
        }
        Ok(())
    }

    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>> {
        let entry = self
            .conn
            .query_row(
                &format!("{ENTRY_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_entry_row,
            )
            .optional()?;
        Ok(entry)
    }

    fn list_entries(&self) -> RepoResult<Vec<Entry>> {
        self.query_entries(
            &format!("{ENTRY_SELECT_SQL} ORDER BY position ASC, id ASC;"),
            [],
        )
    }

    fn entries_for_section(&self, section_id: SectionId) -> RepoResult<Vec<Entry>> {
        self.query_entries(
            &format!(
                "{ENTRY_SELECT_SQL}
                 WHERE section_id = ?1
                 ORDER BY position ASC, id ASC;"
            ),
            [section_id],
        )
    }

    fn unassigned_entries(&self) -> RepoResult<Vec<Entry>> {
        self.query_entries(
            &format!(
                "{ENTRY_SELECT_SQL}
                 WHERE section_id IS NULL
                 ORDER BY position ASC, id ASC;"
            ),
            [],
        )
    }

    fn move_entry(&self, id: EntryId, section_id: Option<SectionId>) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let position = next_entry_position(&tx, section_id)?;
        let changed = tx.execute(
            "UPDATE entries SET section_id = ?2, position = ?3 WHERE id = ?1;",
            params![id, section_id, position],
        )?;
        tx.commit()?;

        if changed > 0 {
            self.changes.notify(&[Table::Entries]);
        }
        Ok(())
    }

    fn search_entries(&self, query: &str) -> RepoResult<Vec<Entry>> {
        self.query_entries(
            &format!(
                "{ENTRY_SELECT_SQL}
                 WHERE instr(lower(title), lower(?1)) > 0
                    OR instr(lower(body), lower(?1)) > 0
                 ORDER BY created_at DESC, id DESC;"
            ),
            [query.trim()],
        )
    }

    fn reorder_entries(&self, ids: &[EntryId]) -> RepoResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        if reindex(self.conn, OrderedTable::Entries, ids)? > 0 {
            self.changes.notify(&[Table::Entries]);
        }
        Ok(())
    }
}

fn parse_entry_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: row.get("id")?,
        title: row.get("title")?,
        body: row.get("body")?,
        section_id: row.get("section_id")?,
        created_at: row.get("created_at")?,
        position: row.get("position")?,
    })
}
