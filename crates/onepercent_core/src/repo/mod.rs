//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per table.
//! - Isolate SQLite query details from service orchestration.
//! - Publish committed mutations to the change hub.
//!
//! # Invariants
//! - Repositories only accept connections migrated to the latest version.
//! - Reads for unknown ids return `None`/empty; writes that touch no row
//!   succeed as no-ops.
//! - List reads order by `position ASC, id ASC`.

pub mod entry_repo;
mod reindex;
pub mod section_repo;
pub mod task_repo;

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::ValidationError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from journal repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Input record failed field validation.
    Validation(ValidationError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Reorder input names the same row more than once.
    DuplicateReorderId {
        table: &'static str,
        id: i64,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "journal repository requires schema version {expected_version}, \
                 got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "journal repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "journal repository requires column `{column}` in table `{table}`"
            ),
            Self::DuplicateReorderId { table, id } => {
                write!(f, "reorder of `{table}` lists id {id} more than once")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Current wall-clock time as Unix epoch milliseconds.
pub(crate) fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Rejects connections that are not migrated or lack required columns.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, table)? {
        return Err(RepoError::MissingRequiredTable(table));
    }

    let existing = table_columns(conn, table)?;
    for column in columns {
        if !existing.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get(1)?);
    }
    Ok(columns)
}
