//! Persistence adapters for the state record.
//!
//! # Responsibility
//! - Define the load/save contract the state store depends on.
//! - Keep storage details (SQLite, JSON encoding) out of the store.
//!
//! # Invariants
//! - The whole tree is read and written as one record under one fixed key.
//! - Adapters never validate or migrate the tree they return.

pub mod memory_repo;
pub mod state_repo;
