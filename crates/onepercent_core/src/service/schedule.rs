//! Calendar-oriented task views: today, weekly pager, future log.
//!
//! # Responsibility
//! - Turn calendar positions into task query windows.
//! - Shape weekly results into exactly seven day buckets.
//!
//! # Invariants
//! - Window boundaries are local midnights in the caller's time zone.
//! - `WeekView::days` always has 7 items, Sunday through Saturday.

use crate::calendar::{
    day_window, days_in_week, future_log_start_ms, local_date_of, week_range_from_epoch_day,
    week_window, WeekRange,
};
use crate::live::{ChangeHub, LiveQuery, Table};
use crate::model::task::Task;
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoResult;
use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One day of the weekly pager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTasks {
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
}

/// Weekly pager state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekView {
    pub range: WeekRange,
    pub days: Vec<DayTasks>,
}

/// Buckets `tasks` into the seven days of `range` by local due date.
///
/// Order inside each day follows the input order.
pub fn group_by_day<Tz: TimeZone>(range: WeekRange, tasks: Vec<Task>, tz: &Tz) -> WeekView {
    let mut by_date: HashMap<NaiveDate, Vec<Task>> = HashMap::new();
    for task in tasks {
        if let Some(date) = local_date_of(task.due_date, tz) {
            by_date.entry(date).or_default().push(task);
        }
    }

    let days = days_in_week(range)
        .into_iter()
        .map(|date| DayTasks {
            date,
            tasks: by_date.remove(&date).unwrap_or_default(),
        })
        .collect();
    WeekView { range, days }
}

pub struct ScheduleService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> ScheduleService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Tasks due on `today`.
    pub fn today_tasks<Tz: TimeZone>(&self, today: NaiveDate, tz: &Tz) -> RepoResult<Vec<Task>> {
        self.repo.tasks_in_window(day_window(today, tz))
    }

    /// Seven-day view of `range`.
    pub fn week_view<Tz: TimeZone>(&self, range: WeekRange, tz: &Tz) -> RepoResult<WeekView> {
        let tasks = self.repo.tasks_in_window(week_window(range, tz))?;
        Ok(group_by_day(range, tasks, tz))
    }

    /// Seven-day view for a week token.
    ///
    /// `Ok(None)` when the token is outside the calendar or its week holds no
    /// supported task date.
    pub fn week_view_for_token<Tz: TimeZone>(
        &self,
        week_start_epoch_day: i64,
        tz: &Tz,
    ) -> RepoResult<Option<WeekView>> {
        match week_range_from_epoch_day(week_start_epoch_day).filter(WeekRange::is_supported) {
            Some(range) => self.week_view(range, tz).map(Some),
            None => Ok(None),
        }
    }

    /// Tasks due after the four-week window that starts with `today`'s week.
    pub fn future_log<Tz: TimeZone>(&self, today: NaiveDate, tz: &Tz) -> RepoResult<Vec<Task>> {
        self.repo.tasks_from(future_log_start_ms(today, tz))
    }

    pub fn watch_today<'a, Tz: TimeZone + 'a>(
        &'a self,
        hub: &ChangeHub,
        today: NaiveDate,
        tz: Tz,
    ) -> LiveQuery<'a, Vec<Task>> {
        LiveQuery::new(hub, &[Table::Tasks], move || self.today_tasks(today, &tz))
    }

    pub fn watch_week<'a, Tz: TimeZone + 'a>(
        &'a self,
        hub: &ChangeHub,
        range: WeekRange,
        tz: Tz,
    ) -> LiveQuery<'a, WeekView> {
        LiveQuery::new(hub, &[Table::Tasks], move || self.week_view(range, &tz))
    }

    pub fn watch_future_log<'a, Tz: TimeZone + 'a>(
        &'a self,
        hub: &ChangeHub,
        today: NaiveDate,
        tz: Tz,
    ) -> LiveQuery<'a, Vec<Task>> {
        LiveQuery::new(hub, &[Table::Tasks], move || self.future_log(today, &tz))
    }
}
