//! Habit manager and completion ledger operations.
//!
//! # Invariants
//! - Wholesale updates keep or replace the ledger only as the caller's
//!   `CompletionCarry` says.
//! - Toggling the same day twice restores the original flag.

use crate::model::habit::{CompletionCarry, Habit, HabitInput};
use crate::model::ids::{issue_id, HABIT_ID_PREFIX};
use crate::model::validation::require_text;
use crate::notify::EntityKind;
use crate::repo::state_repo::StateRepository;
use crate::service::{ServiceError, ServiceResult};
use crate::store::StateStore;
use chrono::{Datelike, Days, NaiveDate};
use log::info;

const WEEKDAY_LABELS: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];

/// One cell of a habit's week strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekDay {
    pub label: &'static str,
    pub date: NaiveDate,
    pub completed: bool,
}

pub struct HabitService<'s, R: StateRepository> {
    store: &'s mut StateStore<R>,
}

impl<'s, R: StateRepository> HabitService<'s, R> {
    pub fn new(store: &'s mut StateStore<R>) -> Self {
        Self { store }
    }

    /// Creates a habit with an empty ledger.
    pub fn create(&mut self, input: HabitInput) -> ServiceResult<Habit> {
        let name = require_text("name", &input.name)?;
        let now = self.store.clock().now();
        let id = issue_id(
            HABIT_ID_PREFIX,
            now,
            self.store.get().habits.iter().map(|habit| habit.id.as_str()),
        );
        let habit = Habit {
            id,
            name,
            frequency: input.frequency,
            color: input.color,
            completions: Default::default(),
        };

        let created = habit.clone();
        self.store
            .mutate(EntityKind::Habit, move |tree| tree.habits.push(habit));
        info!("event=habit_create module=service status=ok id={}", created.id);
        Ok(created)
    }

    /// Replaces name, frequency and color; the ledger follows `carry`.
    pub fn update(
        &mut self,
        id: &str,
        input: HabitInput,
        carry: CompletionCarry,
    ) -> ServiceResult<Habit> {
        let name = require_text("name", &input.name)?;
        let index = self.index_of(id)?;
        let completions = match carry {
            CompletionCarry::CarryForward => self.store.get().habits[index].completions.clone(),
            CompletionCarry::Replace(ledger) => ledger,
        };
        let habit = Habit {
            id: id.to_string(),
            name,
            frequency: input.frequency,
            color: input.color,
            completions,
        };

        let updated = habit.clone();
        self.store
            .mutate(EntityKind::Habit, move |tree| tree.habits[index] = habit);
        Ok(updated)
    }

    /// Flips completion of habit `id` on `date`; returns the new flag.
    pub fn toggle_completion(&mut self, id: &str, date: NaiveDate) -> ServiceResult<bool> {
        let index = self.index_of(id)?;
        let completed = self
            .store
            .mutate(EntityKind::Habit, move |tree| tree.habits[index].toggle(date));
        info!(
            "event=habit_toggle module=service status=ok id={id} date={date} completed={completed}"
        );
        Ok(completed)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.store.mutate(EntityKind::Habit, |tree| {
            tree.habits.retain(|habit| habit.id != id);
        });
        true
    }

    pub fn get(&self, id: &str) -> Option<&Habit> {
        self.store.get().habits.iter().find(|habit| habit.id == id)
    }

    pub fn list(&self) -> &[Habit] {
        &self.store.get().habits
    }

    pub fn completed_count_on(&self, date: NaiveDate) -> usize {
        completed_count_on(&self.store.get().habits, date)
    }

    fn index_of(&self, id: &str) -> ServiceResult<usize> {
        self.store
            .get()
            .habits
            .iter()
            .position(|habit| habit.id == id)
            .ok_or_else(|| ServiceError::not_found(EntityKind::Habit, id))
    }
}

/// Number of habits marked complete on `date`.
pub fn completed_count_on(habits: &[Habit], date: NaiveDate) -> usize {
    habits
        .iter()
        .filter(|habit| habit.is_completed_on(date))
        .count()
}

/// Sunday-to-Saturday strip of the week containing `today`.
pub fn week_strip(habit: &Habit, today: NaiveDate) -> Vec<WeekDay> {
    let offset = u64::from(today.weekday().num_days_from_sunday());
    let sunday = today - Days::new(offset);
    WEEKDAY_LABELS
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let date = sunday + Days::new(index as u64);
            WeekDay {
                label: *label,
                date,
                completed: habit.is_completed_on(date),
            }
        })
        .collect()
}
