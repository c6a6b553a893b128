//! Host-supplied runtime configuration.
//!
//! # Invariants
//! - `db_path = None` selects in-memory persistence.
//! - A configured log directory must be absolute.

use crate::logging::default_log_level;
use crate::timer::DEFAULT_POMODORO_SECONDS;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// File name used when a host only knows its data directory.
pub const DEFAULT_DB_FILE_NAME: &str = "pinkplanner.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    RelativeLogDir(PathBuf),
    ZeroPomodoroLength,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "invalid planner config: {message}"),
            Self::RelativeLogDir(path) => {
                write!(f, "log_dir must be an absolute path, got `{}`", path.display())
            }
            Self::ZeroPomodoroLength => write!(f, "pomodoro_seconds must be greater than zero"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level_string")]
    pub level: String,
    pub log_dir: PathBuf,
}

impl LoggingConfig {
    pub fn new(level: impl Into<String>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            level: level.into(),
            log_dir: log_dir.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub db_path: Option<PathBuf>,
    pub logging: Option<LoggingConfig>,
    pub pomodoro_seconds: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            logging: None,
            pomodoro_seconds: DEFAULT_POMODORO_SECONDS,
        }
    }
}

impl PlannerConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(logging) = &self.logging {
            if !logging.log_dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(logging.log_dir.clone()));
            }
        }
        if self.pomodoro_seconds == 0 {
            return Err(ConfigError::ZeroPomodoroLength);
        }
        Ok(())
    }
}

fn default_level_string() -> String {
    default_log_level().to_string()
}
