//! Calendar today-panel aggregate.

use crate::notify::{ChangeListener, EntityKind, Snapshot};
use crate::service::{event_service, task_service};
use chrono::NaiveDate;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodayPanel {
    pub date: Option<NaiveDate>,
    /// Titles of tasks due today, stored order.
    pub task_titles: Vec<String>,
    /// Titles of events on today, stored order.
    pub event_titles: Vec<String>,
}

#[derive(Debug, Default)]
pub struct TodayPanelView {
    panel: TodayPanel,
    refreshes: usize,
}

impl TodayPanelView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self) -> &TodayPanel {
        &self.panel
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes
    }
}

impl ChangeListener for TodayPanelView {
    fn name(&self) -> &'static str {
        "today_panel"
    }

    fn interests(&self) -> &[EntityKind] {
        &[EntityKind::Task, EntityKind::Event]
    }

    fn refresh(&mut self, snapshot: &Snapshot<'_>) {
        let tree = snapshot.tree;
        self.panel = TodayPanel {
            date: Some(snapshot.today),
            task_titles: task_service::due_on(&tree.tasks, snapshot.today)
                .into_iter()
                .map(|task| task.title.clone())
                .collect(),
            event_titles: event_service::on(&tree.events, snapshot.today)
                .into_iter()
                .map(|event| event.title.clone())
                .collect(),
        };
        self.refreshes += 1;
    }
}
