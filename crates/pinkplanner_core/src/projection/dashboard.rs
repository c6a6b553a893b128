//! Dashboard summary aggregate.
//!
//! # Invariants
//! - The week window covers tasks updated within the last 7 days of `now`.
//! - `percent` is 0 when the window holds no tasks.
//! - At most `UPCOMING_EVENT_LIMIT` upcoming events, earliest first.

use crate::notify::{ChangeListener, EntityKind, Snapshot};
use crate::service::{event_service, habit_service, task_service};
use chrono::{Duration, NaiveDate};

pub const UPCOMING_EVENT_LIMIT: usize = 3;
const WEEK_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekProgress {
    pub total: usize,
    pub done: usize,
    /// Rounded completion percentage, 0..=100.
    pub percent: u8,
}

impl WeekProgress {
    pub fn new(total: usize, done: usize) -> Self {
        let percent = if total == 0 {
            0
        } else {
            ((done as f64 / total as f64) * 100.0).round() as u8
        };
        Self {
            total,
            done,
            percent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingEvent {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    pub today: Option<NaiveDate>,
    pub tasks_due_today: usize,
    pub week: WeekProgress,
    pub upcoming_events: Vec<UpcomingEvent>,
    pub habits_completed_today: usize,
}

impl DashboardSummary {
    /// Derives the summary from a committed snapshot.
    pub fn derive(snapshot: &Snapshot<'_>) -> Self {
        let tree = snapshot.tree;
        let week_start = snapshot.now - Duration::days(WEEK_WINDOW_DAYS);
        let week_tasks = task_service::updated_since(&tree.tasks, week_start, snapshot.now);
        let done = week_tasks.iter().filter(|task| task.is_done()).count();

        Self {
            today: Some(snapshot.today),
            tasks_due_today: task_service::due_on(&tree.tasks, snapshot.today).len(),
            week: WeekProgress::new(week_tasks.len(), done),
            upcoming_events: event_service::upcoming(
                &tree.events,
                snapshot.today,
                UPCOMING_EVENT_LIMIT,
            )
            .into_iter()
            .map(|event| UpcomingEvent {
                id: event.id.clone(),
                title: event.title.clone(),
                date: event.date,
            })
            .collect(),
            habits_completed_today: habit_service::completed_count_on(&tree.habits, snapshot.today),
        }
    }
}

/// Listener keeping a `DashboardSummary` current.
#[derive(Debug, Default)]
pub struct DashboardView {
    summary: DashboardSummary,
    refreshes: usize,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> &DashboardSummary {
        &self.summary
    }

    /// Number of refreshes received so far.
    pub fn refreshes(&self) -> usize {
        self.refreshes
    }
}

impl ChangeListener for DashboardView {
    fn name(&self) -> &'static str {
        "dashboard"
    }

    fn interests(&self) -> &[EntityKind] {
        &[EntityKind::Task, EntityKind::Event, EntityKind::Habit]
    }

    fn refresh(&mut self, snapshot: &Snapshot<'_>) {
        self.summary = DashboardSummary::derive(snapshot);
        self.refreshes += 1;
    }
}
