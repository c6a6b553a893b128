//! Input validation shared by entity managers.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected manager input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty after trimming.
    BlankField(&'static str),
    /// Status string is not one of the known task statuses.
    UnknownStatus(String),
    /// Priority string is not one of the known task priorities.
    UnknownPriority(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
            Self::UnknownStatus(value) => write!(
                f,
                "unknown task status `{value}`; expected not_started|in_progress|almost_done|done"
            ),
            Self::UnknownPriority(value) => {
                write!(f, "unknown task priority `{value}`; expected low|medium|high")
            }
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and rejects it when nothing is left.
pub fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(trimmed.to_string())
}
