//! Entity managers.
//!
//! # Responsibility
//! - Validate input, issue ids, fill defaults, and route every write through
//!   `StateStore::mutate` with the matching `EntityKind`.
//! - Offer pure derivation queries used by projections.
//!
//! # Invariants
//! - Updates replace the whole record; only fields a manager documents as
//!   carried forward survive from the previous record.
//! - Deletes never cascade and never fail on a missing id.

use crate::model::validation::ValidationError;
use crate::notify::EntityKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod category_service;
pub mod event_service;
pub mod habit_service;
pub mod note_service;
pub mod task_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Manager-level failure surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    Validation(ValidationError),
    NotFound { kind: EntityKind, id: String },
}

impl ServiceError {
    pub(crate) fn not_found(kind: EntityKind, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound { .. } => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Trims an optional field; blank becomes `None`, as an empty form field does.
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}
