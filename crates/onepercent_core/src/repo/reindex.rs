//! Manual-order bookkeeping shared by entries and sections.
//!
//! # Invariants
//! - A reorder assigns `position = list index` to every listed row inside one
//!   immediate transaction; readers see all new positions or none.
//! - Only `position` changes. Group membership and content are untouched.
//! - Concurrent reorders of the same group are not serialized against each
//!   other beyond SQLite's single-writer lock.

use super::{RepoError, RepoResult};
use log::{debug, error};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use std::collections::HashSet;

/// Tables carrying a manual `position` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OrderedTable {
    Entries,
    Sections,
}

impl OrderedTable {
    fn name(self) -> &'static str {
        match self {
            Self::Entries => "entries",
            Self::Sections => "sections",
        }
    }

    fn update_position_sql(self) -> &'static str {
        match self {
            Self::Entries => "UPDATE entries SET position = ?2 WHERE id = ?1;",
            Self::Sections => "UPDATE sections SET position = ?2 WHERE id = ?1;",
        }
    }
}

/// Persists `ids[i].position = i` atomically. Returns rows updated.
///
/// Ids that no longer exist are skipped; duplicate ids are rejected before
/// any write.
pub(crate) fn reindex(conn: &Connection, table: OrderedTable, ids: &[i64]) -> RepoResult<usize> {
    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(*id) {
            return Err(RepoError::DuplicateReorderId {
                table: table.name(),
                id: *id,
            });
        }
    }

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let mut updated = 0;
    {
        let mut stmt = tx.prepare(table.update_position_sql())?;
        for (index, id) in ids.iter().enumerate() {
            match stmt.execute(params![id, index as i64]) {
                Ok(changed) => updated += changed,
                Err(err) => {
                    error!(
                        "event=reorder module=repo status=error table={} index={} error={}",
                        table.name(),
                        index,
                        err
                    );
                    return Err(err.into());
                }
            }
        }
    }
    tx.commit()?;

    debug!(
        "event=reorder module=repo status=ok table={} requested={} updated={}",
        table.name(),
        ids.len(),
        updated
    );
    Ok(updated)
}

/// Next free position at the end of the entry group `section_id`.
pub(crate) fn next_entry_position(conn: &Connection, section_id: Option<i64>) -> RepoResult<i64> {
    let next = match section_id {
        Some(section_id) => conn.query_row(
            "SELECT COALESCE(MAX(position), -1) + 1
             FROM entries
             WHERE section_id = ?1;",
            [section_id],
            |row| row.get(0),
        )?,
        None => conn.query_row(
            "SELECT COALESCE(MAX(position), -1) + 1
             FROM entries
             WHERE section_id IS NULL;",
            [],
            |row| row.get(0),
        )?,
    };
    Ok(next)
}

/// Next free position at the end of the global section list.
pub(crate) fn next_section_position(conn: &Connection) -> RepoResult<i64> {
    let next = conn.query_row(
        "SELECT COALESCE(MAX(position), -1) + 1 FROM sections;",
        [],
        |row| row.get(0),
    )?;
    Ok(next)
}
