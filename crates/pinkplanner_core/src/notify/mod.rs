//! Typed change signals and synchronous fan-out to dependent aggregates.
//!
//! # Responsibility
//! - Name the entity kinds a mutation can touch.
//! - Deliver one refresh per committed mutation to every listener that
//!   declared interest in the changed kind.
//!
//! # Invariants
//! - Delivery is synchronous; when `publish` returns, every interested
//!   listener has re-derived from the committed tree.
//! - Listeners are refreshed in registration order.
//! - There is no partial mode: interest in a kind means refresh on every
//!   change of that kind, whatever entity was touched.

use crate::model::state::StateTree;
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, trace};
use std::cell::RefCell;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Slice of the state tree a mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Task,
    Event,
    Note,
    Habit,
    Category,
    Settings,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Task,
        EntityKind::Event,
        EntityKind::Note,
        EntityKind::Habit,
        EntityKind::Category,
        EntityKind::Settings,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Event => "event",
            Self::Note => "note",
            Self::Habit => "habit",
            Self::Category => "category",
            Self::Settings => "settings",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view handed to listeners during a refresh.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub tree: &'a StateTree,
    /// Local calendar date at publish time.
    pub today: NaiveDate,
    /// Instant at publish time.
    pub now: DateTime<Utc>,
}

/// Aggregate that re-derives itself when certain entity kinds change.
pub trait ChangeListener {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;
    /// Kinds whose changes make this listener stale.
    fn interests(&self) -> &[EntityKind];
    /// Recomputes derived state from `snapshot`.
    fn refresh(&mut self, snapshot: &Snapshot<'_>);
}

/// Registry of listeners in registration order.
#[derive(Default)]
pub struct ChangeBus {
    listeners: Vec<Rc<RefCell<dyn ChangeListener>>>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` and returns a shared handle for reading it back.
    pub fn subscribe<L>(&mut self, listener: L) -> Rc<RefCell<L>>
    where
        L: ChangeListener + 'static,
    {
        let handle = Rc::new(RefCell::new(listener));
        let erased: Rc<RefCell<dyn ChangeListener>> = handle.clone();
        self.listeners.push(erased);
        handle
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Refreshes every listener interested in `kind`; returns how many ran.
    pub fn publish(&self, kind: EntityKind, snapshot: &Snapshot<'_>) -> usize {
        let mut refreshed = 0;
        for listener in &self.listeners {
            let mut listener = listener.borrow_mut();
            if !listener.interests().contains(&kind) {
                continue;
            }
            trace!(
                "event=listener_refresh module=notify listener={} kind={kind}",
                listener.name()
            );
            listener.refresh(snapshot);
            refreshed += 1;
        }
        debug!("event=change_publish module=notify status=ok kind={kind} refreshed={refreshed}");
        refreshed
    }

    /// Refreshes every listener regardless of interests.
    ///
    /// Hosts call this when derivations depend on something outside the
    /// tree, such as the local date.
    pub fn refresh_all(&self, snapshot: &Snapshot<'_>) {
        for listener in &self.listeners {
            listener.borrow_mut().refresh(snapshot);
        }
    }
}
