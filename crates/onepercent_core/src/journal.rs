//! The journal store handle.
//!
//! # Responsibility
//! - Own the one SQLite connection and the change hub for a process.
//! - Lend repositories that borrow both.
//!
//! # Invariants
//! - Construct one `Journal` at the top of the application and pass it by
//!   reference; core keeps no global handle.
//! - Every repository handed out shares this journal's change hub, so live
//!   queries see writes made through any of them.

use crate::config::JournalConfig;
use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::live::{ChangeHub, LiveQuery, Table};
use crate::repo::entry_repo::SqliteEntryRepository;
use crate::repo::section_repo::SqliteSectionRepository;
use crate::repo::task_repo::SqliteTaskRepository;
use crate::repo::RepoResult;
use rusqlite::Connection;
use std::path::Path;

/// Process-wide journal store.
pub struct Journal {
    conn: Connection,
    changes: ChangeHub,
}

impl Journal {
    /// Opens (or creates) the journal database at `path`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::from_migrated(open_db(path)?))
    }

    /// Opens a throwaway in-memory journal.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_migrated(open_db_in_memory()?))
    }

    /// Opens the journal at the configured database path.
    pub fn from_config(config: &JournalConfig) -> DbResult<Self> {
        Self::open(&config.db_path)
    }

    fn from_migrated(conn: Connection) -> Self {
        Self {
            conn,
            changes: ChangeHub::new(),
        }
    }

    /// Raw connection, for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn changes(&self) -> &ChangeHub {
        &self.changes
    }

    pub fn tasks(&self) -> RepoResult<SqliteTaskRepository<'_>> {
        SqliteTaskRepository::try_new(&self.conn, &self.changes)
    }

    pub fn entries(&self) -> RepoResult<SqliteEntryRepository<'_>> {
        SqliteEntryRepository::try_new(&self.conn, &self.changes)
    }

    pub fn sections(&self) -> RepoResult<SqliteSectionRepository<'_>> {
        SqliteSectionRepository::try_new(&self.conn, &self.changes)
    }

    /// Live query over this journal's change hub.
    pub fn watch<'a, T>(
        &'a self,
        tables: &[Table],
        query: impl Fn() -> RepoResult<T> + 'a,
    ) -> LiveQuery<'a, T> {
        LiveQuery::new(&self.changes, tables, query)
    }
}
