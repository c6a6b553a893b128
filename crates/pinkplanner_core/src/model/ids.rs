//! Entity identity issuing.
//!
//! Ids are `<kind prefix><epoch millis>`. The prefix is part of the persisted
//! contract; the numeric suffix only has to be unique within one sequence.

use chrono::{DateTime, Utc};

pub const CATEGORY_ID_PREFIX: &str = "cat_";
pub const TASK_ID_PREFIX: &str = "task_";
pub const EVENT_ID_PREFIX: &str = "event_";
pub const HABIT_ID_PREFIX: &str = "habit_";
pub const NOTE_ID_PREFIX: &str = "note_";

/// Issues an id for `prefix` that is absent from `existing`.
///
/// Starts from the creation instant in milliseconds and bumps the suffix
/// until no collision remains, so two creations inside the same millisecond
/// still get distinct ids.
pub fn issue_id<'a, I>(prefix: &str, now: DateTime<Utc>, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let taken: Vec<&str> = existing.into_iter().collect();
    let mut suffix = now.timestamp_millis();
    loop {
        let candidate = format!("{prefix}{suffix}");
        if !taken.iter().any(|id| *id == candidate) {
            return candidate;
        }
        suffix += 1;
    }
}
