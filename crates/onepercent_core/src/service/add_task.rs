//! Add-task form validation and persistence.
//!
//! # Invariants
//! - A task needs a non-blank name and a chosen date within the supported
//!   calendar years.
//! - The stored due date is local midnight of the chosen date.

use crate::calendar::is_supported_date;
use crate::model::task::{NewTask, TaskId};
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoError;
use chrono::{NaiveDate, TimeZone};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Form state of the add-task screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub name: String,
    pub date: Option<NaiveDate>,
}

impl TaskDraft {
    /// Whether the form may be submitted.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && self.date.is_some()
    }
}

/// Errors from add-task submission.
#[derive(Debug)]
pub enum AddTaskError {
    BlankName,
    MissingDate,
    DateOutOfRange(NaiveDate),
    Repo(RepoError),
}

impl Display for AddTaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "task name must not be blank"),
            Self::MissingDate => write!(f, "task date must be selected"),
            Self::DateOutOfRange(date) => {
                write!(f, "task date {date} is outside the supported range")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AddTaskError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AddTaskError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub struct AddTaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> AddTaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates `draft` and stores it as a task due on its date in `tz`.
    pub fn submit<Tz: TimeZone>(
        &self,
        draft: &TaskDraft,
        tz: &Tz,
    ) -> Result<TaskId, AddTaskError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(AddTaskError::BlankName);
        }
        let date = draft.date.ok_or(AddTaskError::MissingDate)?;
        if !is_supported_date(date) {
            return Err(AddTaskError::DateOutOfRange(date));
        }

        let id = self.repo.add_task(&NewTask::due_on(name, date, tz))?;
        info!("event=task_add module=service status=ok task_id={id} due={date}");
        Ok(id)
    }
}
