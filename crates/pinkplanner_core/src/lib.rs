//! Core state, managers and derived views for PinkPlanner.
//! This crate is the single source of truth for planner invariants.

pub mod calendar;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod planner;
pub mod projection;
pub mod repo;
pub mod service;
pub mod store;
pub mod theme;
pub mod timer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, LoggingConfig, PlannerConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::{Category, NO_CATEGORY_LABEL};
pub use model::event::{Event, EventInput};
pub use model::habit::{CompletionCarry, CompletionLedger, Habit, HabitInput};
pub use model::note::{Note, NoteInput};
pub use model::settings::Settings;
pub use model::state::StateTree;
pub use model::task::{Task, TaskInput, TaskPriority, TaskStatus};
pub use model::validation::ValidationError;
pub use notify::{ChangeListener, EntityKind, Snapshot};
pub use planner::{DynStateRepository, Planner, PlannerSetupError};
pub use repo::memory_repo::MemoryStateRepository;
pub use repo::state_repo::{
    RepoError, RepoResult, SqliteStateRepository, StateRepository, STATE_KEY,
};
pub use service::{ServiceError, ServiceResult};
pub use store::{BootOrigin, Durability, StateStore};
pub use theme::{Palette, PaletteSink, ThemeName};
pub use timer::{PomodoroTimer, TimerState};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
