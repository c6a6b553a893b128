//! Task model.
//!
//! # Invariants
//! - `updated_at` is refreshed on every field change and status transition.
//! - `created_at` never moves after creation.
//! - Loading never rejects a task for an unknown status or priority, or for
//!   missing timestamps; those values are carried through unchanged.

use crate::model::validation::ValidationError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Kanban column of a task.
///
/// Stored text outside the four columns loads as `Unknown` and is written
/// back unchanged; only `parse` rejects it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    AlmostDone,
    Done,
    Unknown(String),
}

impl TaskStatus {
    /// Board column order.
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::AlmostDone,
        TaskStatus::Done,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::AlmostDone => "almost_done",
            Self::Done => "done",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::NotStarted => "Not started",
            Self::InProgress => "In progress",
            Self::AlmostDone => "Almost done",
            Self::Done => "Done",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Parses caller input; unknown text is rejected.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match Self::from_stored(value.trim()) {
            Self::Unknown(other) => Err(ValidationError::UnknownStatus(other)),
            status => Ok(status),
        }
    }

    fn from_stored(value: &str) -> Self {
        match value {
            "not_started" => Self::NotStarted,
            "in_progress" => Self::InProgress,
            "almost_done" => Self::AlmostDone,
            "done" => Self::Done,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<Option<String>> for TaskStatus {
    fn from(value: Option<String>) -> Self {
        value.map_or_else(Self::default, |raw| Self::from_stored(&raw))
    }
}

impl From<TaskStatus> for String {
    fn from(value: TaskStatus) -> Self {
        match value {
            TaskStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Task priority; unknown stored text survives a load like `TaskStatus`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Unknown(String),
}

impl TaskPriority {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match Self::from_stored(value.trim()) {
            Self::Unknown(other) => Err(ValidationError::UnknownPriority(other)),
            priority => Ok(priority),
        }
    }

    fn from_stored(value: &str) -> Self {
        match value {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<Option<String>> for TaskPriority {
    fn from(value: Option<String>) -> Self {
        // Empty text falls back like a missing value.
        match value.as_deref() {
            None | Some("") => Self::default(),
            Some(raw) => Self::from_stored(raw),
        }
    }
}

impl From<TaskPriority> for String {
    fn from(value: TaskPriority) -> Self {
        match value {
            TaskPriority::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub priority: TaskPriority,
    /// Absent on records written before timestamps existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Last write instant: `updated_at`, else `created_at`.
    pub fn last_touched(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.created_at)
    }
}

/// Caller-supplied task fields for create and full-replace update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskInput {
    pub title: String,
    pub description: String,
    /// `None` means `not_started`.
    pub status: Option<TaskStatus>,
    pub due_date: Option<NaiveDate>,
    pub category_id: Option<String>,
    /// `None` means `medium`.
    pub priority: Option<TaskPriority>,
}

impl TaskInput {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}
