//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose screen-level journal operations to Dart via FRB.
//! - Flatten core types into plain DTOs and response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Dates cross the boundary as epoch days, instants as epoch milliseconds.
//! - Calendar math uses the device's local time zone.

use chrono::{Local, NaiveDate};
use log::warn;
use onepercent_core::calendar::{
    date_from_epoch_day, epoch_day, format_day_title, format_week_label,
    week_range_from_epoch_day, week_start_epoch_day,
};
use onepercent_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AddTaskError, AddTaskService, Entry, EntryRepository, IndexService, Journal, RepoResult,
    ScheduleService, SectionWithEntries, Task, TaskDraft, WeekRange,
};
use std::sync::{Mutex, MutexGuard};

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Opened journal shared by every call from one Dart isolate group.
#[flutter_rust_bridge::frb(opaque)]
pub struct AppHandle {
    journal: Mutex<Journal>,
}

impl AppHandle {
    fn new(journal: Journal) -> Self {
        Self {
            journal: Mutex::new(journal),
        }
    }

    fn journal(&self) -> MutexGuard<'_, Journal> {
        self.journal
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Opens (or creates and migrates) the journal database at `db_path`.
#[flutter_rust_bridge::frb(sync)]
pub fn app_open(db_path: String) -> Result<AppHandle, String> {
    let path = db_path.trim();
    if path.is_empty() {
        return Err("db_path must not be empty".to_string());
    }
    Journal::open(path)
        .map(AppHandle::new)
        .map_err(|err| format!("app_open failed: {err}"))
}

/// Opens a throwaway in-memory journal.
#[flutter_rust_bridge::frb(sync)]
pub fn app_open_in_memory() -> Result<AppHandle, String> {
    Journal::open_in_memory()
        .map(AppHandle::new)
        .map_err(|err| format!("app_open_in_memory failed: {err}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: i64,
    pub name: String,
    /// Due instant, local midnight of the due day.
    pub due_date_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryItem {
    pub id: i64,
    pub title: String,
    pub body: String,
    /// `None` for free-floating entries.
    pub section_id: Option<i64>,
    pub created_at_ms: i64,
    pub position: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionItem {
    pub id: i64,
    pub name: String,
    pub position: i64,
    pub entries: Vec<EntryItem>,
}

/// Week navigation row: routing token plus display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekItem {
    pub week_start_epoch_day: i64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayTasksItem {
    pub epoch_day: i64,
    /// Pager title, e.g. `Wednesday 2/25`.
    pub title: String,
    pub tasks: Vec<TaskItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub ok: bool,
    pub items: Vec<TaskItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekViewResponse {
    pub ok: bool,
    pub week: Option<WeekItem>,
    /// Seven days, Sunday through Saturday, when `ok`.
    pub days: Vec<DayTasksItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexResponse {
    pub ok: bool,
    pub past_weeks: Vec<WeekItem>,
    pub current_weeks: Vec<WeekItem>,
    pub sections: Vec<SectionItem>,
    pub unassigned: Vec<EntryItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryResponse {
    pub ok: bool,
    pub entry: Option<EntryItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryListResponse {
    pub ok: bool,
    pub items: Vec<EntryItem>,
    pub message: String,
}

/// Generic action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Created row id for create actions.
    pub id: Option<i64>,
    pub message: String,
}

impl ActionResponse {
    fn done(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            id: None,
            message: message.into(),
        }
    }

    fn created(message: impl Into<String>, id: i64) -> Self {
        Self {
            ok: true,
            id: Some(id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }

    fn from_result(op: &str, result: RepoResult<()>, message: &str) -> Self {
        match result {
            Ok(()) => Self::done(message),
            Err(err) => Self::failure(format!("{op} failed: {err}")),
        }
    }
}

/// Tasks due today in local time.
#[flutter_rust_bridge::frb(sync)]
pub fn today_tasks(handle: &AppHandle) -> TaskListResponse {
    let today = local_today();
    let journal = handle.journal();
    let result = journal
        .tasks()
        .and_then(|repo| ScheduleService::new(repo).today_tasks(today, &Local));
    task_list_response("today_tasks", result)
}

/// Weekly pager for the week token `week_start_epoch_day`.
#[flutter_rust_bridge::frb(sync)]
pub fn week_view(handle: &AppHandle, week_start_epoch_day: i64) -> WeekViewResponse {
    let range = week_range_from_epoch_day(week_start_epoch_day).filter(WeekRange::is_supported);
    let Some(range) = range else {
        warn!("event=ffi_week_view module=ffi status=error token={week_start_epoch_day}");
        return WeekViewResponse {
            ok: false,
            week: None,
            days: Vec::new(),
            message: format!("invalid week token: {week_start_epoch_day}"),
        };
    };

    let journal = handle.journal();
    let result = journal
        .tasks()
        .and_then(|repo| ScheduleService::new(repo).week_view(range, &Local));
    match result {
        Ok(view) => WeekViewResponse {
            ok: true,
            week: Some(week_item(view.range)),
            days: view
                .days
                .into_iter()
                .map(|day| DayTasksItem {
                    epoch_day: epoch_day(day.date),
                    title: format_day_title(day.date),
                    tasks: day.tasks.into_iter().map(task_item).collect(),
                })
                .collect(),
            message: String::new(),
        },
        Err(err) => WeekViewResponse {
            ok: false,
            week: Some(week_item(range)),
            days: Vec::new(),
            message: format!("week_view failed: {err}"),
        },
    }
}

/// Week token of the week containing today.
#[flutter_rust_bridge::frb(sync)]
pub fn current_week_token() -> i64 {
    week_start_epoch_day(local_today())
}

/// Index screen state as of today.
#[flutter_rust_bridge::frb(sync)]
pub fn index_view(handle: &AppHandle) -> IndexResponse {
    let today = local_today();
    let journal = handle.journal();
    let result = with_index(&journal, |service| service.index_view(today, &Local));
    match result {
        Ok(view) => IndexResponse {
            ok: true,
            past_weeks: view.past_weeks.into_iter().map(week_item).collect(),
            current_weeks: view.current_weeks.into_iter().map(week_item).collect(),
            sections: view.sections.into_iter().map(section_item).collect(),
            unassigned: view.unassigned.into_iter().map(entry_item).collect(),
            message: String::new(),
        },
        Err(err) => IndexResponse {
            ok: false,
            past_weeks: Vec::new(),
            current_weeks: Vec::new(),
            sections: Vec::new(),
            unassigned: Vec::new(),
            message: format!("index_view failed: {err}"),
        },
    }
}

/// Tasks due after the current four-week window.
#[flutter_rust_bridge::frb(sync)]
pub fn future_log(handle: &AppHandle) -> TaskListResponse {
    let today = local_today();
    let journal = handle.journal();
    let result = journal
        .tasks()
        .and_then(|repo| ScheduleService::new(repo).future_log(today, &Local));
    task_list_response("future_log", result)
}

/// Adds a task due on `due_epoch_day` (local midnight).
#[flutter_rust_bridge::frb(sync)]
pub fn add_task(handle: &AppHandle, name: String, due_epoch_day: Option<i64>) -> ActionResponse {
    let date = match due_epoch_day {
        Some(day) => match date_from_epoch_day(day) {
            Some(date) => Some(date),
            None => return ActionResponse::failure(format!("invalid due day: {day}")),
        },
        None => None,
    };
    let draft = TaskDraft { name, date };

    let journal = handle.journal();
    let result = journal
        .tasks()
        .map_err(AddTaskError::from)
        .and_then(|repo| AddTaskService::new(repo).submit(&draft, &Local));
    match result {
        Ok(id) => ActionResponse::created("Task added.", id),
        Err(err) => ActionResponse::failure(format!("add_task failed: {err}")),
    }
}

/// Creates an empty entry, optionally inside `section_id`.
#[flutter_rust_bridge::frb(sync)]
pub fn create_entry(handle: &AppHandle, section_id: Option<i64>) -> ActionResponse {
    let journal = handle.journal();
    let result = with_index(&journal, |service| service.create_entry(section_id));
    match result {
        Ok(id) => ActionResponse::created("Entry created.", id),
        Err(err) => ActionResponse::failure(format!("create_entry failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn get_entry(handle: &AppHandle, entry_id: i64) -> EntryResponse {
    let journal = handle.journal();
    match journal.entries().and_then(|repo| repo.get_entry(entry_id)) {
        Ok(Some(entry)) => EntryResponse {
            ok: true,
            entry: Some(entry_item(entry)),
            message: String::new(),
        },
        Ok(None) => EntryResponse {
            ok: false,
            entry: None,
            message: format!("entry not found: {entry_id}"),
        },
        Err(err) => EntryResponse {
            ok: false,
            entry: None,
            message: format!("get_entry failed: {err}"),
        },
    }
}

/// Writes title and body immediately.
///
/// The Dart editor calls this after its own quiet period and on dispose.
#[flutter_rust_bridge::frb(sync)]
pub fn save_entry(
    handle: &AppHandle,
    entry_id: i64,
    title: String,
    body: String,
) -> ActionResponse {
    let journal = handle.journal();
    let result = journal
        .entries()
        .and_then(|repo| repo.update_entry(entry_id, &title, &body));
    ActionResponse::from_result("save_entry", result, "Entry saved.")
}

#[flutter_rust_bridge::frb(sync)]
pub fn delete_entry(handle: &AppHandle, entry_id: i64) -> ActionResponse {
    let journal = handle.journal();
    let result = with_index(&journal, |service| service.delete_entry(entry_id));
    ActionResponse::from_result("delete_entry", result, "Entry deleted.")
}

/// Moves an entry into `section_id`, or out of any section when `None`.
#[flutter_rust_bridge::frb(sync)]
pub fn move_entry(handle: &AppHandle, entry_id: i64, section_id: Option<i64>) -> ActionResponse {
    let journal = handle.journal();
    let result = with_index(&journal, |service| service.move_entry(entry_id, section_id));
    ActionResponse::from_result("move_entry", result, "Entry moved.")
}

#[flutter_rust_bridge::frb(sync)]
pub fn search_entries(handle: &AppHandle, text: String) -> EntryListResponse {
    let journal = handle.journal();
    match with_index(&journal, |service| service.search_entries(text.trim())) {
        Ok(entries) => {
            let items: Vec<EntryItem> = entries.into_iter().map(entry_item).collect();
            let message = if items.is_empty() {
                "No results.".to_string()
            } else {
                format!("Found {} result(s).", items.len())
            };
            EntryListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => EntryListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("search_entries failed: {err}"),
        },
    }
}

/// Persists a drag-and-drop order of entries.
#[flutter_rust_bridge::frb(sync)]
pub fn reorder_entries(handle: &AppHandle, entry_ids: Vec<i64>) -> ActionResponse {
    let journal = handle.journal();
    let result = with_index(&journal, |service| service.reorder_entries(&entry_ids));
    ActionResponse::from_result("reorder_entries", result, "Entries reordered.")
}

#[flutter_rust_bridge::frb(sync)]
pub fn create_section(handle: &AppHandle, name: String) -> ActionResponse {
    let journal = handle.journal();
    match with_index(&journal, |service| service.create_section(&name)) {
        Ok(id) => ActionResponse::created("Section created.", id),
        Err(err) => ActionResponse::failure(format!("create_section failed: {err}")),
    }
}

/// Deletes a section. Its entries stay and become free-floating.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_section(handle: &AppHandle, section_id: i64) -> ActionResponse {
    let journal = handle.journal();
    let result = with_index(&journal, |service| service.delete_section(section_id));
    ActionResponse::from_result("delete_section", result, "Section deleted.")
}

#[flutter_rust_bridge::frb(sync)]
pub fn reorder_sections(handle: &AppHandle, section_ids: Vec<i64>) -> ActionResponse {
    let journal = handle.journal();
    let result = with_index(&journal, |service| service.reorder_sections(&section_ids));
    ActionResponse::from_result("reorder_sections", result, "Sections reordered.")
}

type JournalIndexService<'j> = IndexService<
    onepercent_core::SqliteTaskRepository<'j>,
    onepercent_core::SqliteEntryRepository<'j>,
    onepercent_core::SqliteSectionRepository<'j>,
>;

fn with_index<T>(
    journal: &Journal,
    f: impl FnOnce(&JournalIndexService<'_>) -> RepoResult<T>,
) -> RepoResult<T> {
    let service = IndexService::new(journal.tasks()?, journal.entries()?, journal.sections()?);
    f(&service)
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn task_list_response(op: &str, result: RepoResult<Vec<Task>>) -> TaskListResponse {
    match result {
        Ok(tasks) => TaskListResponse {
            ok: true,
            items: tasks.into_iter().map(task_item).collect(),
            message: String::new(),
        },
        Err(err) => TaskListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("{op} failed: {err}"),
        },
    }
}

fn task_item(task: Task) -> TaskItem {
    TaskItem {
        id: task.id,
        name: task.name,
        due_date_ms: task.due_date,
    }
}

fn entry_item(entry: Entry) -> EntryItem {
    EntryItem {
        id: entry.id,
        title: entry.title,
        body: entry.body,
        section_id: entry.section_id,
        created_at_ms: entry.created_at,
        position: entry.position,
    }
}

fn section_item(group: SectionWithEntries) -> SectionItem {
    SectionItem {
        id: group.section.id,
        name: group.section.name,
        position: group.section.position,
        entries: group.entries.into_iter().map(entry_item).collect(),
    }
}

fn week_item(range: WeekRange) -> WeekItem {
    WeekItem {
        week_start_epoch_day: epoch_day(range.sunday),
        label: format_week_label(range),
    }
}
