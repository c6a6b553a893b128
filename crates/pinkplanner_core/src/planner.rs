//! Host entry point wiring the store, managers and derived views.
//!
//! # Responsibility
//! - Bootstrap one `StateStore` and subscribe every built-in view to it.
//! - Hand out short-lived managers that mutate through that store.
//!
//! # Invariants
//! - Views are subscribed before the first mutation and stay subscribed
//!   for the planner's lifetime.
//! - Managers borrow the planner mutably, so only one mutation path is
//!   live at a time.

use crate::clock::Clock;
use crate::config::{ConfigError, PlannerConfig};
use crate::logging::{init_logging, LoggingError};
use crate::projection::{
    CategoryOptionsView, CategorySidebarView, DashboardView, FormKind, TodayPanelView,
};
use crate::repo::memory_repo::MemoryStateRepository;
use crate::repo::state_repo::{RepoError, SqliteStateRepository, StateRepository};
use crate::service::category_service::CategoryService;
use crate::service::event_service::EventService;
use crate::service::habit_service::HabitService;
use crate::service::note_service::NoteService;
use crate::service::task_service::TaskService;
use crate::store::StateStore;
use crate::theme::ThemeController;
use crate::timer::PomodoroTimer;
use log::info;
use std::cell::{Ref, RefCell};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Repository chosen at runtime from a `PlannerConfig`.
pub type DynStateRepository = Box<dyn StateRepository>;

#[derive(Debug)]
pub enum PlannerSetupError {
    Config(ConfigError),
    Logging(LoggingError),
    Repo(RepoError),
}

impl Display for PlannerSetupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PlannerSetupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ConfigError> for PlannerSetupError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<LoggingError> for PlannerSetupError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<RepoError> for PlannerSetupError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub struct Planner<R: StateRepository> {
    store: StateStore<R>,
    dashboard: Rc<RefCell<DashboardView>>,
    today_panel: Rc<RefCell<TodayPanelView>>,
    task_categories: Rc<RefCell<CategoryOptionsView>>,
    event_categories: Rc<RefCell<CategoryOptionsView>>,
    note_categories: Rc<RefCell<CategoryOptionsView>>,
    sidebar: Rc<RefCell<CategorySidebarView>>,
    timer: PomodoroTimer,
}

impl Planner<DynStateRepository> {
    /// Validates `config`, starts logging when configured, and opens the
    /// SQLite file at `db_path` or an in-memory repository.
    pub fn from_config(
        config: &PlannerConfig,
        clock: Rc<dyn Clock>,
    ) -> Result<Self, PlannerSetupError> {
        config.validate()?;
        if let Some(logging) = &config.logging {
            init_logging(logging)?;
        }

        let repo: DynStateRepository = match &config.db_path {
            Some(path) => Box::new(SqliteStateRepository::open(path)?),
            None => Box::new(MemoryStateRepository::new()),
        };
        let mut planner = Self::open(repo, clock);
        planner.timer = PomodoroTimer::new(config.pomodoro_seconds);
        Ok(planner)
    }
}

impl<R: StateRepository> Planner<R> {
    /// Bootstraps the store from `repo` and subscribes the built-in views.
    pub fn open(repo: R, clock: Rc<dyn Clock>) -> Self {
        let mut store = StateStore::bootstrap(repo, clock);
        let dashboard = store.subscribe(DashboardView::new());
        let today_panel = store.subscribe(TodayPanelView::new());
        let task_categories = store.subscribe(CategoryOptionsView::new(FormKind::Task));
        let event_categories = store.subscribe(CategoryOptionsView::new(FormKind::Event));
        let note_categories = store.subscribe(CategoryOptionsView::new(FormKind::Note));
        let sidebar = store.subscribe(CategorySidebarView::new());

        info!(
            "event=planner_open module=planner status=ok origin={:?} durable={}",
            store.origin(),
            store.is_durable()
        );

        Self {
            store,
            dashboard,
            today_panel,
            task_categories,
            event_categories,
            note_categories,
            sidebar,
            timer: PomodoroTimer::default(),
        }
    }

    pub fn store(&self) -> &StateStore<R> {
        &self.store
    }

    pub fn tasks(&mut self) -> TaskService<'_, R> {
        TaskService::new(&mut self.store)
    }

    pub fn events(&mut self) -> EventService<'_, R> {
        EventService::new(&mut self.store)
    }

    pub fn notes(&mut self) -> NoteService<'_, R> {
        NoteService::new(&mut self.store)
    }

    pub fn habits(&mut self) -> HabitService<'_, R> {
        HabitService::new(&mut self.store)
    }

    pub fn categories(&mut self) -> CategoryService<'_, R> {
        CategoryService::new(&mut self.store)
    }

    pub fn theme(&mut self) -> ThemeController<'_, R> {
        ThemeController::new(&mut self.store)
    }

    pub fn dashboard(&self) -> Ref<'_, DashboardView> {
        self.dashboard.borrow()
    }

    pub fn today_panel(&self) -> Ref<'_, TodayPanelView> {
        self.today_panel.borrow()
    }

    pub fn category_options(&self, form: FormKind) -> Ref<'_, CategoryOptionsView> {
        match form {
            FormKind::Task => self.task_categories.borrow(),
            FormKind::Event => self.event_categories.borrow(),
            FormKind::Note => self.note_categories.borrow(),
        }
    }

    pub fn sidebar(&self) -> Ref<'_, CategorySidebarView> {
        self.sidebar.borrow()
    }

    pub fn timer(&self) -> &PomodoroTimer {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut PomodoroTimer {
        &mut self.timer
    }

    /// Re-derives every view, e.g. when the host notices a date rollover.
    pub fn refresh_all(&self) {
        self.store.refresh_all();
    }
}

#[cfg(test)]
mod tests {
    use super::Planner;
    use crate::clock::{Clock, FixedClock};
    use crate::config::PlannerConfig;
    use crate::model::task::TaskInput;
    use crate::projection::FormKind;
    use crate::repo::memory_repo::MemoryStateRepository;
    use crate::service::category_service::CategoryInput;
    use crate::timer::TimerState;
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::rc::Rc;

    fn clock() -> Rc<dyn Clock> {
        Rc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        ))
    }

    #[test]
    fn views_are_populated_on_open() {
        let planner = Planner::open(MemoryStateRepository::new(), clock());
        assert_eq!(planner.sidebar().rows().len(), 3);
        for form in FormKind::ALL {
            assert_eq!(planner.category_options(form).options().len(), 3);
        }
        assert_eq!(planner.dashboard().summary().week.percent, 0);
    }

    #[test]
    fn task_creation_reaches_dashboard_and_today_panel() {
        let mut planner = Planner::open(MemoryStateRepository::new(), clock());
        let mut input = TaskInput::titled("Essay draft");
        input.due_date = NaiveDate::from_ymd_opt(2024, 3, 15);
        planner.tasks().create(input).expect("task should be created");

        assert_eq!(planner.dashboard().summary().week.total, 1);
        assert_eq!(
            planner.today_panel().panel().task_titles,
            vec!["Essay draft".to_string()]
        );
    }

    #[test]
    fn category_change_reaches_every_form() {
        let mut planner = Planner::open(MemoryStateRepository::new(), clock());
        planner
            .categories()
            .create(CategoryInput::new("Gym", "var(--pink-accent)"))
            .expect("category should be created");

        for form in FormKind::ALL {
            assert_eq!(planner.category_options(form).options().len(), 4);
        }
        assert_eq!(planner.sidebar().rows().len(), 4);
    }

    #[test]
    fn from_config_without_db_uses_memory_and_configured_timer() {
        let config = PlannerConfig {
            pomodoro_seconds: 90,
            ..PlannerConfig::default()
        };
        let planner = Planner::from_config(&config, clock()).expect("planner should open");
        assert_eq!(planner.timer().remaining(), 90);
        assert_eq!(planner.timer().state(), TimerState::Idle);
        assert!(planner.store().is_durable());
    }
}
