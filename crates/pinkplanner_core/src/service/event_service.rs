//! Calendar event manager.
//!
//! # Invariants
//! - `upcoming` orders by date ascending; same-day events keep stored order.
//! - Time fields are stored as typed by the user, blank meaning unset.

use crate::model::event::{Event, EventInput};
use crate::model::ids::{issue_id, EVENT_ID_PREFIX};
use crate::model::validation::require_text;
use crate::notify::EntityKind;
use crate::repo::state_repo::StateRepository;
use crate::service::{normalize_optional, ServiceError, ServiceResult};
use crate::store::StateStore;
use chrono::NaiveDate;
use log::info;

pub struct EventService<'s, R: StateRepository> {
    store: &'s mut StateStore<R>,
}

impl<'s, R: StateRepository> EventService<'s, R> {
    pub fn new(store: &'s mut StateStore<R>) -> Self {
        Self { store }
    }

    pub fn create(&mut self, input: EventInput) -> ServiceResult<Event> {
        let title = require_text("title", &input.title)?;
        let now = self.store.clock().now();
        let id = issue_id(
            EVENT_ID_PREFIX,
            now,
            self.store.get().events.iter().map(|event| event.id.as_str()),
        );
        let event = build_event(id, title, input);

        let created = event.clone();
        self.store
            .mutate(EntityKind::Event, move |tree| tree.events.push(event));
        info!(
            "event=event_create module=service status=ok id={} date={}",
            created.id, created.date
        );
        Ok(created)
    }

    /// Replaces every field of event `id` with `input`.
    pub fn update(&mut self, id: &str, input: EventInput) -> ServiceResult<Event> {
        let title = require_text("title", &input.title)?;
        let index = self
            .store
            .get()
            .events
            .iter()
            .position(|event| event.id == id)
            .ok_or_else(|| ServiceError::not_found(EntityKind::Event, id))?;
        let event = build_event(id.to_string(), title, input);

        let updated = event.clone();
        self.store
            .mutate(EntityKind::Event, move |tree| tree.events[index] = event);
        Ok(updated)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.store.mutate(EntityKind::Event, |tree| {
            tree.events.retain(|event| event.id != id);
        });
        true
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.store.get().events.iter().find(|event| event.id == id)
    }

    pub fn list(&self) -> &[Event] {
        &self.store.get().events
    }

    pub fn on(&self, date: NaiveDate) -> Vec<&Event> {
        on(&self.store.get().events, date)
    }

    pub fn in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<&Event> {
        in_range(&self.store.get().events, start, end)
    }

    pub fn upcoming(&self, from: NaiveDate, limit: usize) -> Vec<&Event> {
        upcoming(&self.store.get().events, from, limit)
    }
}

fn build_event(id: String, title: String, input: EventInput) -> Event {
    Event {
        id,
        title,
        date: input.date,
        start_time: normalize_optional(input.start_time),
        end_time: normalize_optional(input.end_time),
        category_id: normalize_optional(input.category_id),
    }
}

/// Events on exactly `date`, in stored order.
pub fn on(events: &[Event], date: NaiveDate) -> Vec<&Event> {
    events.iter().filter(|event| event.date == date).collect()
}

/// Events within `start..=end`, in stored order.
pub fn in_range(events: &[Event], start: NaiveDate, end: NaiveDate) -> Vec<&Event> {
    events
        .iter()
        .filter(|event| event.date >= start && event.date <= end)
        .collect()
}

/// First `limit` events on or after `from`, earliest first.
pub fn upcoming(events: &[Event], from: NaiveDate, limit: usize) -> Vec<&Event> {
    let mut ahead: Vec<&Event> = events.iter().filter(|event| event.date >= from).collect();
    ahead.sort_by_key(|event| event.date);
    ahead.truncate(limit);
    ahead
}

#[cfg(test)]
mod tests {
    use super::upcoming;
    use crate::model::event::Event;
    use chrono::NaiveDate;

    fn event(id: &str, date: NaiveDate) -> Event {
        Event {
            id: id.to_string(),
            title: id.to_string(),
            date,
            start_time: None,
            end_time: None,
            category_id: None,
        }
    }

    #[test]
    fn upcoming_sorts_drops_past_and_truncates() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let events = vec![
            event("later", today + chrono::Days::new(3)),
            event("past", today - chrono::Days::new(1)),
            event("today", today),
            event("next", today + chrono::Days::new(1)),
            event("after", today + chrono::Days::new(2)),
        ];
        let ids: Vec<&str> = upcoming(&events, today, 3)
            .into_iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["today", "next", "after"]);
    }
}
