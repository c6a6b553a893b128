//! Habit model and its per-day completion ledger.
//!
//! # Invariants
//! - A missing ledger key means "not completed".
//! - Toggling writes the flipped flag; keys are never removed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sparse per-day completion flags.
pub type CompletionLedger = BTreeMap<NaiveDate, bool>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    /// Free-form cadence label, e.g. `daily` or `weekly`.
    pub frequency: String,
    pub color: String,
    #[serde(default)]
    pub completions: CompletionLedger,
}

impl Habit {
    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completions.get(&date).copied().unwrap_or(false)
    }

    /// Flips the flag for `date` and returns the new value.
    pub fn toggle(&mut self, date: NaiveDate) -> bool {
        let next = !self.is_completed_on(date);
        self.completions.insert(date, next);
        next
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitInput {
    pub name: String,
    pub frequency: String,
    pub color: String,
}

/// What happens to an existing ledger on a wholesale habit update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CompletionCarry {
    /// Keep the ledger already stored for the habit.
    #[default]
    CarryForward,
    /// Install the given ledger instead.
    Replace(CompletionLedger),
}
