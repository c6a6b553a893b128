//! Planner domain model.
//!
//! # Responsibility
//! - Define the persisted `StateTree` and every entity it holds.
//! - Keep the JSON shape identical to the stored record (camelCase fields).
//!
//! # Invariants
//! - Entity ids are unique within their own sequence.
//! - Category references may dangle; readers must tolerate missing targets.

pub mod category;
pub mod event;
pub mod habit;
pub mod ids;
pub mod note;
pub mod settings;
pub mod state;
pub mod task;
pub mod validation;
