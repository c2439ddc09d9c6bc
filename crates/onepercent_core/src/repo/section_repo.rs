//! Section repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create, list, reorder and cascade-delete for sections.
//!
//! # Invariants
//! - Sections form one global group ordered by `position ASC, id ASC`.
//! - Deleting a section clears `entries.section_id` for its entries and
//!   removes the section row in the same transaction; entries themselves
//!   are never deleted by this path.

use super::reindex::{next_section_position, reindex, OrderedTable};
use super::{ensure_connection_ready, now_epoch_ms, RepoResult};
use crate::live::{ChangeHub, Table};
use crate::model::section::{normalize_section_name, Section, SectionId};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const SECTION_SELECT_SQL: &str = "SELECT id, name, created_at, position FROM sections";

/// Repository interface for section operations.
pub trait SectionRepository {
    /// Inserts one section at the end of the list and returns its id.
    fn add_section(&self, name: &str) -> RepoResult<SectionId>;
    /// Loads one section by id.
    fn get_section(&self, id: SectionId) -> RepoResult<Option<Section>>;
    /// All sections by position.
    fn list_sections(&self) -> RepoResult<Vec<Section>>;
    /// Deletes one section and makes its entries free-floating.
    fn delete_section(&self, id: SectionId) -> RepoResult<()>;
    /// Persists `ids[i].position = i` atomically.
    fn reorder_sections(&self, ids: &[SectionId]) -> RepoResult<()>;
}

/// SQLite-backed section repository.
pub struct SqliteSectionRepository<'conn> {
    conn: &'conn Connection,
    changes: &'conn ChangeHub,
}

impl<'conn> SqliteSectionRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection, changes: &'conn ChangeHub) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            "sections",
            &["id", "name", "created_at", "position"],
        )?;
        ensure_connection_ready(conn, "entries", &["section_id"])?;
        Ok(Self { conn, changes })
    }
}

impl SectionRepository for SqliteSectionRepository<'_> {
    fn add_section(&self, name: &str) -> RepoResult<SectionId> {
        let name = normalize_section_name(name)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let position = next_section_position(&tx)?;
        tx.execute(
            "INSERT INTO sections (name, created_at, position) VALUES (?1, ?2, ?3);",
            params![name, now_epoch_ms(), position],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        self.changes.notify(&[Table::Sections]);
        Ok(id)
    }

    fn get_section(&self, id: SectionId) -> RepoResult<Option<Section>> {
        let section = self
            .conn
            .query_row(
                &format!("{SECTION_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_section_row,
            )
            .optional()?;
        Ok(section)
    }

    fn list_sections(&self) -> RepoResult<Vec<Section>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SECTION_SELECT_SQL} ORDER BY position ASC, id ASC;"))?;
        let sections = stmt
            .query_map([], parse_section_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sections)
    }

    fn delete_section(&self, id: SectionId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let outcome = tx
            .execute("UPDATE entries SET section_id = NULL WHERE section_id = ?1;", [id])
            .and_then(|released| {
                tx.execute("DELETE FROM sections WHERE id = ?1;", [id])
                    .map(|deleted| (released, deleted))
            });

        let (released, deleted) = match outcome {
            Ok(counts) => counts,
            Err(err) => {
                error!(
                    "event=section_delete module=repo status=error section_id={} error={}",
                    id, err
                );
                return Err(err.into());
            }
        };
        tx.commit()?;

        info!(
            "event=section_delete module=repo status=ok section_id={} \
             released_entries={} deleted={}",
            id, released, deleted
        );
        if released > 0 || deleted > 0 {
            self.changes.notify(&[Table::Entries, Table::Sections]);
        }
        Ok(())
    }

    fn reorder_sections(&self, ids: &[SectionId]) -> RepoResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        if reindex(self.conn, OrderedTable::Sections, ids)? > 0 {
            self.changes.notify(&[Table::Sections]);
        }
        Ok(())
    }
}

fn parse_section_row(row: &Row<'_>) -> rusqlite::Result<Section> {
    Ok(Section {
        id: row.get("id")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
        position: row.get("position")?,
    })
}
