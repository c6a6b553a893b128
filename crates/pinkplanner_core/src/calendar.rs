//! Month grid math and the calendar category filter.
//!
//! # Invariants
//! - A grid always has `GRID_CELLS` cells and starts on a Sunday.
//! - An empty filter shows every event; uncategorized events always show.

use crate::model::event::Event;
use chrono::{Datelike, Days, Months, NaiveDate};
use std::collections::BTreeSet;

/// Six weeks of seven days.
pub const GRID_CELLS: usize = 42;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Displayed month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    first: NaiveDate,
}

impl MonthCursor {
    /// Cursor on the month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    /// `month` is 1-based; `None` when out of range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Moves by `delta` months, wrapping across years.
    pub fn shift(&self, delta: i32) -> Self {
        let months = Months::new(delta.unsigned_abs());
        let first = if delta >= 0 {
            self.first.checked_add_months(months)
        } else {
            self.first.checked_sub_months(months)
        };
        Self {
            first: first.unwrap_or(self.first),
        }
    }

    /// e.g. `March 2024`.
    pub fn label(&self) -> String {
        format!("{} {}", MONTH_NAMES[self.first.month0() as usize], self.year())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub date: NaiveDate,
    pub in_month: bool,
}

/// 42 consecutive days starting on the Sunday on or before the 1st.
pub fn month_grid(cursor: MonthCursor) -> Vec<GridCell> {
    let first = cursor.first_day();
    let lead = u64::from(first.weekday().num_days_from_sunday());
    let start = first - Days::new(lead);
    (0..GRID_CELLS as u64)
        .map(|offset| {
            let date = start + Days::new(offset);
            GridCell {
                date,
                in_month: date.month() == first.month() && date.year() == first.year(),
            }
        })
        .collect()
}

/// Set of category ids selected in the calendar sidebar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    active: BTreeSet<String>,
}

impl CategoryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or removes `category_id`.
    pub fn toggle(&mut self, category_id: &str) {
        if !self.active.remove(category_id) {
            self.active.insert(category_id.to_string());
        }
    }

    /// Whether a category chip is highlighted.
    pub fn is_active(&self, category_id: &str) -> bool {
        self.active.is_empty() || self.active.contains(category_id)
    }

    pub fn shows(&self, event: &Event) -> bool {
        match event.category_id.as_deref() {
            Some(id) => self.is_active(id),
            None => true,
        }
    }

    /// Events on `date` that pass the filter, stored order.
    pub fn events_on<'a>(&self, events: &'a [Event], date: NaiveDate) -> Vec<&'a Event> {
        events
            .iter()
            .filter(|event| event.date == date && self.shows(event))
            .collect()
    }
}
