//! Task manager.
//!
//! # Responsibility
//! - Create, fully replace, re-status and delete tasks.
//! - Derive due-date, board-column and activity projections.
//!
//! # Invariants
//! - New tasks start `not_started` with `medium` priority unless given.
//! - `updated_at` moves on every write; `created_at` never does.

use crate::model::ids::{issue_id, TASK_ID_PREFIX};
use crate::model::state::StateTree;
use crate::model::task::{Task, TaskInput, TaskPriority, TaskStatus};
use crate::model::validation::{require_text, ValidationError};
use crate::notify::EntityKind;
use crate::repo::state_repo::StateRepository;
use crate::service::{normalize_optional, ServiceError, ServiceResult};
use crate::store::StateStore;
use chrono::{DateTime, NaiveDate, Utc};
use log::info;

/// Task manager bound to one store for the duration of a borrow.
pub struct TaskService<'s, R: StateRepository> {
    store: &'s mut StateStore<R>,
}

impl<'s, R: StateRepository> TaskService<'s, R> {
    pub fn new(store: &'s mut StateStore<R>) -> Self {
        Self { store }
    }

    /// Creates a task and appends it to the task sequence.
    pub fn create(&mut self, input: TaskInput) -> ServiceResult<Task> {
        let title = require_text("title", &input.title)?;
        let now = self.store.clock().now();
        let id = issue_id(
            TASK_ID_PREFIX,
            now,
            self.store.get().tasks.iter().map(|task| task.id.as_str()),
        );
        let task = Task {
            id,
            title,
            description: input.description.trim().to_string(),
            status: known_status(input.status)?,
            due_date: input.due_date,
            category_id: normalize_optional(input.category_id),
            priority: known_priority(input.priority)?,
            created_at: Some(now),
            updated_at: Some(now),
        };

        let created = task.clone();
        self.store
            .mutate(EntityKind::Task, move |tree| tree.tasks.push(task));
        info!(
            "event=task_create module=service status=ok id={}",
            created.id
        );
        Ok(created)
    }

    /// Dashboard quick-add: a task due today with default fields.
    pub fn quick_add(&mut self, title: &str) -> ServiceResult<Task> {
        let today = self.store.clock().today();
        self.create(TaskInput {
            title: title.to_string(),
            due_date: Some(today),
            priority: Some(TaskPriority::Medium),
            ..TaskInput::default()
        })
    }

    /// Replaces every editable field of task `id` with `input`.
    pub fn update(&mut self, id: &str, input: TaskInput) -> ServiceResult<Task> {
        let title = require_text("title", &input.title)?;
        let index = self.index_of(id)?;
        let now = self.store.clock().now();
        let previous = &self.store.get().tasks[index];
        let task = Task {
            id: previous.id.clone(),
            title,
            description: input.description.trim().to_string(),
            status: known_status(input.status)?,
            due_date: input.due_date,
            category_id: normalize_optional(input.category_id),
            priority: known_priority(input.priority)?,
            created_at: previous.created_at,
            updated_at: Some(now),
        };

        let updated = task.clone();
        self.store
            .mutate(EntityKind::Task, move |tree| tree.tasks[index] = task);
        Ok(updated)
    }

    /// Moves task `id` to `status` and refreshes `updated_at`.
    pub fn set_status(&mut self, id: &str, status: TaskStatus) -> ServiceResult<Task> {
        let status = known_status(Some(status))?;
        let index = self.index_of(id)?;
        let now = self.store.clock().now();
        let updated = self.store.mutate(EntityKind::Task, move |tree| {
            let task = &mut tree.tasks[index];
            task.status = status;
            task.updated_at = Some(now);
            task.clone()
        });
        info!(
            "event=task_status module=service status=ok id={} task_status={}",
            updated.id,
            updated.status.as_str()
        );
        Ok(updated)
    }

    /// Same as `set_status` for raw wire text; unknown values are rejected.
    pub fn set_status_str(&mut self, id: &str, status: &str) -> ServiceResult<Task> {
        let status = TaskStatus::parse(status)?;
        self.set_status(id, status)
    }

    /// Removes task `id`; returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.store.mutate(EntityKind::Task, |tree| {
            tree.tasks.retain(|task| task.id != id);
        });
        true
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.store.get().tasks.iter().find(|task| task.id == id)
    }

    pub fn list(&self) -> &[Task] {
        &self.store.get().tasks
    }

    pub fn due_on(&self, date: NaiveDate) -> Vec<&Task> {
        due_on(&self.store.get().tasks, date)
    }

    pub fn in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<&Task> {
        in_range(&self.store.get().tasks, start, end)
    }

    pub fn by_status(&self, status: TaskStatus) -> Vec<&Task> {
        by_status(&self.store.get().tasks, &status)
    }

    pub fn status_counts(&self) -> [(TaskStatus, usize); 4] {
        status_counts(&self.store.get().tasks)
    }

    pub fn updated_since(&self, since: DateTime<Utc>) -> Vec<&Task> {
        let now = self.store.clock().now();
        updated_since(&self.store.get().tasks, since, now)
    }

    fn index_of(&self, id: &str) -> ServiceResult<usize> {
        index_of(self.store.get(), id).ok_or_else(|| ServiceError::not_found(EntityKind::Task, id))
    }
}

fn index_of(tree: &StateTree, id: &str) -> Option<usize> {
    tree.tasks.iter().position(|task| task.id == id)
}

fn known_status(status: Option<TaskStatus>) -> ServiceResult<TaskStatus> {
    match status.unwrap_or_default() {
        TaskStatus::Unknown(raw) => Err(ValidationError::UnknownStatus(raw).into()),
        status => Ok(status),
    }
}

fn known_priority(priority: Option<TaskPriority>) -> ServiceResult<TaskPriority> {
    match priority.unwrap_or_default() {
        TaskPriority::Unknown(raw) => Err(ValidationError::UnknownPriority(raw).into()),
        priority => Ok(priority),
    }
}

/// Tasks whose due date is exactly `date`, in stored order.
pub fn due_on(tasks: &[Task], date: NaiveDate) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| task.due_date == Some(date))
        .collect()
}

/// Tasks due within `start..=end`, in stored order.
pub fn in_range(tasks: &[Task], start: NaiveDate, end: NaiveDate) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| matches!(task.due_date, Some(due) if due >= start && due <= end))
        .collect()
}

/// One kanban column.
pub fn by_status<'a>(tasks: &'a [Task], status: &TaskStatus) -> Vec<&'a Task> {
    tasks.iter().filter(|task| task.status == *status).collect()
}

/// Per-column counts in board order.
pub fn status_counts(tasks: &[Task]) -> [(TaskStatus, usize); 4] {
    TaskStatus::ALL.map(|status| {
        let count = tasks.iter().filter(|task| task.status == status).count();
        (status, count)
    })
}

/// Tasks touched at or after `since`.
///
/// A task without any timestamp counts as touched today, so it is included
/// whenever `since` is not in the future.
pub fn updated_since(tasks: &[Task], since: DateTime<Utc>, now: DateTime<Utc>) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| task.last_touched().unwrap_or(now) >= since)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{in_range, known_status, status_counts, updated_since};
    use crate::model::task::{Task, TaskPriority, TaskStatus};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn task(id: &str, status: TaskStatus, due: Option<NaiveDate>) -> Task {
        let at = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();
        Task {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            status,
            due_date: due,
            category_id: None,
            priority: TaskPriority::Medium,
            created_at: Some(at),
            updated_at: Some(at),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    #[test]
    fn in_range_is_inclusive_and_skips_undated() {
        let tasks = vec![
            task("a", TaskStatus::Done, Some(day(1))),
            task("b", TaskStatus::Done, Some(day(5))),
            task("c", TaskStatus::Done, Some(day(6))),
            task("d", TaskStatus::Done, None),
        ];
        let ids: Vec<&str> = in_range(&tasks, day(1), day(5))
            .into_iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn updated_since_falls_back_to_created_then_now() {
        let since = Utc.with_ymd_and_hms(2024, 2, 3, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 2, 8, 12, 0, 0).unwrap();
        let mut stale = task("stale", TaskStatus::Done, None);
        stale.updated_at = None;
        let mut fresh = task("fresh", TaskStatus::Done, None);
        fresh.updated_at = None;
        fresh.created_at = Some(now);
        let mut bare = task("bare", TaskStatus::Done, None);
        bare.created_at = None;
        bare.updated_at = None;

        let tasks = vec![stale, fresh, bare];
        let ids: Vec<&str> = updated_since(&tasks, since, now)
            .into_iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["fresh", "bare"]);
    }

    #[test]
    fn unknown_status_is_refused_at_the_manager_boundary() {
        assert!(known_status(Some(TaskStatus::Unknown("blocked".to_string()))).is_err());
        assert_eq!(known_status(None), Ok(TaskStatus::NotStarted));
    }

    #[test]
    fn status_counts_follow_board_order() {
        let tasks = vec![
            task("a", TaskStatus::Done, None),
            task("b", TaskStatus::InProgress, None),
            task("c", TaskStatus::Done, None),
        ];
        assert_eq!(
            status_counts(&tasks),
            [
                (TaskStatus::NotStarted, 0),
                (TaskStatus::InProgress, 1),
                (TaskStatus::AlmostDone, 0),
                (TaskStatus::Done, 2),
            ]
        );
    }
}
