//! Note manager.
//!
//! # Responsibility
//! - Create, fully replace, pin/unpin and delete notes.
//! - Derive the display order and the card excerpt.
//!
//! # Invariants
//! - Display order is pinned first, then `updated_at` descending; ties keep
//!   stored order.
//! - Excerpts never exceed `NOTE_EXCERPT_MAX_CHARS` characters.

use crate::model::ids::{issue_id, NOTE_ID_PREFIX};
use crate::model::note::{Note, NoteInput};
use crate::model::validation::require_text;
use crate::notify::EntityKind;
use crate::repo::state_repo::StateRepository;
use crate::service::{normalize_optional, ServiceError, ServiceResult};
use crate::store::StateStore;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Reverse;

pub const NOTE_EXCERPT_MAX_CHARS: usize = 300;

static LINE_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]*(\r\n|\r|\n)[ \t]*").expect("valid line break regex"));
static BLANK_LINES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{2,}").expect("valid blank lines regex"));
static INLINE_WS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]{2,}").expect("valid inline whitespace regex"));

pub struct NoteService<'s, R: StateRepository> {
    store: &'s mut StateStore<R>,
}

impl<'s, R: StateRepository> NoteService<'s, R> {
    pub fn new(store: &'s mut StateStore<R>) -> Self {
        Self { store }
    }

    pub fn create(&mut self, input: NoteInput) -> ServiceResult<Note> {
        let title = require_text("title", &input.title)?;
        let now = self.store.clock().now();
        let id = issue_id(
            NOTE_ID_PREFIX,
            now,
            self.store.get().notes.iter().map(|note| note.id.as_str()),
        );
        let note = Note {
            id,
            title,
            content: input.content.trim().to_string(),
            category_id: normalize_optional(input.category_id),
            pinned: input.pinned,
            created_at: Some(now),
            updated_at: Some(now),
        };

        let created = note.clone();
        self.store
            .mutate(EntityKind::Note, move |tree| tree.notes.push(note));
        info!("event=note_create module=service status=ok id={}", created.id);
        Ok(created)
    }

    /// Replaces title, content, category and pin flag of note `id`.
    pub fn update(&mut self, id: &str, input: NoteInput) -> ServiceResult<Note> {
        let title = require_text("title", &input.title)?;
        let index = self.index_of(id)?;
        let now = self.store.clock().now();
        let created_at = self.store.get().notes[index].created_at;
        let note = Note {
            id: id.to_string(),
            title,
            content: input.content.trim().to_string(),
            category_id: normalize_optional(input.category_id),
            pinned: input.pinned,
            created_at,
            updated_at: Some(now),
        };

        let updated = note.clone();
        self.store
            .mutate(EntityKind::Note, move |tree| tree.notes[index] = note);
        Ok(updated)
    }

    /// Flips the pin flag of note `id` and refreshes `updated_at`.
    pub fn toggle_pin(&mut self, id: &str) -> ServiceResult<Note> {
        let index = self.index_of(id)?;
        let now = self.store.clock().now();
        let updated = self.store.mutate(EntityKind::Note, move |tree| {
            let note = &mut tree.notes[index];
            note.pinned = !note.pinned;
            note.updated_at = Some(now);
            note.clone()
        });
        Ok(updated)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.store.mutate(EntityKind::Note, |tree| {
            tree.notes.retain(|note| note.id != id);
        });
        true
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.store.get().notes.iter().find(|note| note.id == id)
    }

    pub fn list(&self) -> &[Note] {
        &self.store.get().notes
    }

    pub fn sorted_for_display(&self) -> Vec<&Note> {
        sorted_for_display(&self.store.get().notes)
    }

    fn index_of(&self, id: &str) -> ServiceResult<usize> {
        self.store
            .get()
            .notes
            .iter()
            .position(|note| note.id == id)
            .ok_or_else(|| ServiceError::not_found(EntityKind::Note, id))
    }
}

/// Pinned notes first, most recently updated first within each group.
pub fn sorted_for_display(notes: &[Note]) -> Vec<&Note> {
    let mut ordered: Vec<&Note> = notes.iter().collect();
    ordered.sort_by_key(|note| (!note.pinned, Reverse(note.updated_at)));
    ordered
}

/// Card excerpt for a note body.
///
/// Rules:
/// - Line endings are unified to `\n` and blank-line runs collapse to one.
/// - Runs of spaces/tabs collapse to one space.
/// - The result is trimmed and capped at `NOTE_EXCERPT_MAX_CHARS` chars.
pub fn excerpt(content: &str) -> String {
    let unified = LINE_BREAK_RE.replace_all(content, "\n");
    let single_breaks = BLANK_LINES_RE.replace_all(&unified, "\n");
    let collapsed = INLINE_WS_RE.replace_all(&single_breaks, " ");
    collapsed
        .trim()
        .chars()
        .take(NOTE_EXCERPT_MAX_CHARS)
        .collect()
}
