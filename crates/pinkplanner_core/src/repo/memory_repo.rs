//! In-process repository holding the encoded record in memory.
//!
//! Goes through the same JSON encoding as the SQLite adapter so that a
//! save/load cycle exercises the persisted shape.

use crate::model::state::StateTree;
use crate::repo::state_repo::{decode_state, encode_state, RepoResult, StateRepository};
use std::cell::RefCell;

#[derive(Debug, Default)]
pub struct MemoryStateRepository {
    slot: RefCell<Option<String>>,
}

impl MemoryStateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-filled with raw record text, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: RefCell::new(Some(raw.into())),
        }
    }

    pub fn raw_record(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl StateRepository for MemoryStateRepository {
    fn load_state(&self) -> RepoResult<Option<StateTree>> {
        match self.slot.borrow().as_deref() {
            Some(raw) => decode_state(raw).map(Some),
            None => Ok(None),
        }
    }

    fn save_state(&self, tree: &StateTree) -> RepoResult<()> {
        let raw = encode_state(tree)?;
        *self.slot.borrow_mut() = Some(raw);
        Ok(())
    }
}
