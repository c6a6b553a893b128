//! Owner of the single live `StateTree`.
//!
//! # Responsibility
//! - Bootstrap the tree from the repository, seeding it on first run.
//! - Apply mutations in place, persist, then fan out change signals.
//!
//! # Invariants
//! - There is exactly one live tree; managers never hold copies.
//! - `mutate` returns only after persistence was attempted and every
//!   interested listener refreshed.
//! - A failed save never rolls back the in-memory tree and never reaches
//!   the caller; it only degrades `durability()`.

use crate::clock::Clock;
use crate::model::state::StateTree;
use crate::notify::{ChangeBus, ChangeListener, EntityKind, Snapshot};
use crate::repo::state_repo::StateRepository;
use log::{error, info, warn};
use std::cell::RefCell;
use std::rc::Rc;

/// Where the live tree came from at bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootOrigin {
    /// Adopted verbatim from the repository.
    Loaded,
    /// Nothing was stored; defaults were seeded.
    SeededFresh,
    /// The stored record could not be read; defaults were seeded over it.
    SeededAfterLoadError,
}

/// Whether the last write reached the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Durability {
    Durable,
    Degraded { last_error: String },
}

pub struct StateStore<R: StateRepository> {
    tree: StateTree,
    repo: R,
    clock: Rc<dyn Clock>,
    bus: ChangeBus,
    origin: BootOrigin,
    durability: Durability,
}

impl<R: StateRepository> StateStore<R> {
    /// Loads the stored tree or seeds a fresh one and persists it.
    pub fn bootstrap(repo: R, clock: Rc<dyn Clock>) -> Self {
        let (tree, origin) = match repo.load_state() {
            Ok(Some(tree)) => (tree, BootOrigin::Loaded),
            Ok(None) => (StateTree::seeded(), BootOrigin::SeededFresh),
            Err(err) => {
                warn!("event=state_load module=store status=error action=seed error={err}");
                (StateTree::seeded(), BootOrigin::SeededAfterLoadError)
            }
        };

        let mut store = Self {
            tree,
            repo,
            clock,
            bus: ChangeBus::new(),
            origin,
            durability: Durability::Durable,
        };
        if origin != BootOrigin::Loaded {
            store.persist();
        }

        info!(
            "event=state_bootstrap module=store status=ok origin={:?} tasks={} events={} notes={} habits={} categories={}",
            origin,
            store.tree.tasks.len(),
            store.tree.events.len(),
            store.tree.notes.len(),
            store.tree.habits.len(),
            store.tree.categories.len()
        );
        store
    }

    /// Read-only view of the live tree.
    pub fn get(&self) -> &StateTree {
        &self.tree
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn origin(&self) -> BootOrigin {
        self.origin
    }

    pub fn durability(&self) -> &Durability {
        &self.durability
    }

    pub fn is_durable(&self) -> bool {
        self.durability == Durability::Durable
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Applies `apply` to the live tree, persists, and publishes `kind`.
    pub fn mutate<T>(&mut self, kind: EntityKind, apply: impl FnOnce(&mut StateTree) -> T) -> T {
        let output = apply(&mut self.tree);
        self.persist();
        let snapshot = Snapshot {
            tree: &self.tree,
            today: self.clock.today(),
            now: self.clock.now(),
        };
        self.bus.publish(kind, &snapshot);
        output
    }

    /// Registers a listener and brings it up to date immediately.
    pub fn subscribe<L>(&mut self, listener: L) -> Rc<RefCell<L>>
    where
        L: ChangeListener + 'static,
    {
        let handle = self.bus.subscribe(listener);
        let snapshot = Snapshot {
            tree: &self.tree,
            today: self.clock.today(),
            now: self.clock.now(),
        };
        handle.borrow_mut().refresh(&snapshot);
        handle
    }

    /// Re-derives every listener, e.g. after the local date rolled over.
    pub fn refresh_all(&self) {
        let snapshot = Snapshot {
            tree: &self.tree,
            today: self.clock.today(),
            now: self.clock.now(),
        };
        self.bus.refresh_all(&snapshot);
    }

    fn persist(&mut self) {
        match self.repo.save_state(&self.tree) {
            Ok(()) => {
                if let Durability::Degraded { .. } = self.durability {
                    info!("event=state_save module=store status=recovered");
                }
                self.durability = Durability::Durable;
            }
            Err(err) => {
                error!("event=state_save module=store status=error action=continue_in_memory error={err}");
                self.durability = Durability::Degraded {
                    last_error: err.to_string(),
                };
            }
        }
    }
}
