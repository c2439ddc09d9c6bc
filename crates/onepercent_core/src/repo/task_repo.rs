//! Task repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist dated tasks and answer window queries for the calendar views.
//!
//! # Invariants
//! - Window reads use `[start_ms, end_ms)` and order by `due_date ASC, id ASC`.
//! - Names are validated and trimmed before insert.

use super::{ensure_connection_ready, RepoResult};
use crate::calendar::DayWindow;
use crate::live::{ChangeHub, Table};
use crate::model::task::{NewTask, Task, TaskId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const TASK_SELECT_SQL: &str = "SELECT id, name, due_date FROM tasks";

/// Repository interface for task operations.
pub trait TaskRepository {
    /// Inserts one task and returns its id.
    fn add_task(&self, task: &NewTask) -> RepoResult<TaskId>;
    /// Loads one task by id.
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Tasks due within `window`.
    fn tasks_in_window(&self, window: DayWindow) -> RepoResult<Vec<Task>>;
    /// Smallest stored due date, if any task exists.
    fn earliest_due_date(&self) -> RepoResult<Option<i64>>;
    /// Tasks due on or after `start_ms`.
    fn tasks_from(&self, start_ms: i64) -> RepoResult<Vec<Task>>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
    changes: &'conn ChangeHub,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection, changes: &'conn ChangeHub) -> RepoResult<Self> {
        ensure_connection_ready(conn, "tasks", &["id", "name", "due_date"])?;
        Ok(Self { conn, changes })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn add_task(&self, task: &NewTask) -> RepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (name, due_date) VALUES (?1, ?2);",
            params![task.name.trim(), task.due_date],
        )?;
        let id = self.conn.last_insert_rowid();
        self.changes.notify(&[Table::Tasks]);
        Ok(id)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let task = self
            .conn
            .query_row(
                &format!("{TASK_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_task_row,
            )
            .optional()?;
        Ok(task)
    }

    fn tasks_in_window(&self, window: DayWindow) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE due_date >= ?1
               AND due_date < ?2
             ORDER BY due_date ASC, id ASC;"
        ))?;
        let tasks = stmt
            .query_map(params![window.start_ms, window.end_ms], parse_task_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    fn earliest_due_date(&self) -> RepoResult<Option<i64>> {
        let earliest = self
            .conn
            .query_row("SELECT MIN(due_date) FROM tasks;", [], |row| row.get(0))?;
        Ok(earliest)
    }

    fn tasks_from(&self, start_ms: i64) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE due_date >= ?1
             ORDER BY due_date ASC, id ASC;"
        ))?;
        let tasks = stmt
            .query_map([start_ms], parse_task_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }
}

fn parse_task_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get("id")?,
        name: row.get("name")?,
        due_date: row.get("due_date")?,
    })
}
