//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Apply pending migrations atomically.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - Each version upgrades only from the version right before it.
//!
//! # Version history
//! - v1: `tasks`.
//! - v2: `sections` and `entries`.
//! - v3: `position` on both, backfilled from `created_at` order per group.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("0001_tasks.sql"),
    },
    Migration {
        version: 2,
        sql: include_str!("0002_sections_entries.sql"),
    },
    Migration {
        version: 3,
        sql: include_str!("0003_manual_positions.sql"),
    },
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    apply_migrations_up_to(conn, latest_version())
}

/// Applies pending migrations up to and including `target_version`.
///
/// Used by upgrade tests to materialize an older schema before upgrading.
/// A `target_version` beyond the latest known version is clamped.
pub fn apply_migrations_up_to(conn: &mut Connection, target_version: u32) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    let target = target_version.min(latest);
    if current_version >= target {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        if migration.version <= current_version || migration.version > target {
            continue;
        }

        tx.execute_batch(migration.sql)
            .and_then(|()| {
                tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))
            })
            .map_err(|source| DbError::MigrationFailed {
                version: migration.version,
                source,
            })?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        current_version, target
    );
    Ok(())
}

/// Reads `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
