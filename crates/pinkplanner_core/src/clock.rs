//! Time source used for ids, timestamps and "today" projections.

use chrono::{DateTime, Local, NaiveDate, Utc};
use std::cell::Cell;

/// Supplies the current instant and local calendar date.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
    fn today(&self) -> NaiveDate;
}

/// Wall clock; `today` follows the local calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Manually driven clock for deterministic callers.
///
/// Every `now()` call advances the instant by one millisecond so that
/// consecutive writes get distinct, ordered timestamps.
#[derive(Debug)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
    today: Cell<NaiveDate>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>, today: NaiveDate) -> Self {
        Self {
            now: Cell::new(now),
            today: Cell::new(today),
        }
    }

    /// Clock whose local date is the UTC date of `now`.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self::new(now, now.date_naive())
    }

    pub fn set_now(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn set_today(&self, today: NaiveDate) {
        self.today.set(today);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        let current = self.now.get();
        self.now.set(current + chrono::Duration::milliseconds(1));
        current
    }

    fn today(&self) -> NaiveDate {
        self.today.get()
    }
}
