//! Core domain logic for OnePercent.
//! This crate is the single source of truth for journal invariants.

pub mod calendar;
pub mod config;
pub mod db;
pub mod journal;
pub mod live;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use calendar::{current_week_range, four_week_ranges, DayWindow, WeekRange};
pub use config::JournalConfig;
pub use db::{DbError, DbResult};
pub use journal::Journal;
pub use live::{ChangeHub, LiveQuery, Subscription, Table};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::entry::{Entry, EntryId, NewEntry};
pub use model::section::{Section, SectionId};
pub use model::task::{NewTask, Task, TaskId};
pub use model::ValidationError;
pub use repo::entry_repo::{EntryRepository, SqliteEntryRepository};
pub use repo::section_repo::{SectionRepository, SqliteSectionRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use service::add_task::{AddTaskError, AddTaskService, TaskDraft};
pub use service::entry_editor::{EditorError, EntryEditor};
pub use service::index::{IndexService, IndexView, SectionWithEntries};
pub use service::schedule::{DayTasks, ScheduleService, WeekView};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
