//! State repository contract and SQLite key-value implementation.
//!
//! # Responsibility
//! - Load and save the full `StateTree` as JSON under `STATE_KEY`.
//! - Refuse connections that were not migrated by `db::open_db*`.
//!
//! # Invariants
//! - A save replaces the previous record atomically (single upsert).
//! - An absent row loads as `None`; an undecodable row is `InvalidData`.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::state::StateTree;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::rc::Rc;

/// Fixed key of the single persisted record.
pub const STATE_KEY: &str = "pinkPlannerState";

pub type RepoResult<T> = Result<T, RepoError>;

/// Durable-store failure. Surfaced by adapters, swallowed by the store.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Encode(serde_json::Error),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode state: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted state: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable key-value store for the whole state tree.
pub trait StateRepository {
    /// Returns the stored tree, or `None` when nothing was ever saved.
    fn load_state(&self) -> RepoResult<Option<StateTree>>;
    /// Replaces the stored tree.
    fn save_state(&self, tree: &StateTree) -> RepoResult<()>;
}

impl<R: StateRepository + ?Sized> StateRepository for Rc<R> {
    fn load_state(&self) -> RepoResult<Option<StateTree>> {
        (**self).load_state()
    }

    fn save_state(&self, tree: &StateTree) -> RepoResult<()> {
        (**self).save_state(tree)
    }
}

impl<R: StateRepository + ?Sized> StateRepository for Box<R> {
    fn load_state(&self) -> RepoResult<Option<StateTree>> {
        (**self).load_state()
    }

    fn save_state(&self, tree: &StateTree) -> RepoResult<()> {
        (**self).save_state(tree)
    }
}

/// Encodes a tree as the persisted JSON text.
pub fn encode_state(tree: &StateTree) -> RepoResult<String> {
    serde_json::to_string(tree).map_err(RepoError::Encode)
}

/// Decodes persisted JSON text into a tree.
pub fn decode_state(raw: &str) -> RepoResult<StateTree> {
    serde_json::from_str(raw).map_err(|err| {
        RepoError::InvalidData(format!("`{STATE_KEY}` is not a decodable state tree: {err}"))
    })
}

/// SQLite-backed repository owning its connection.
#[derive(Debug)]
pub struct SqliteStateRepository {
    conn: Connection,
}

impl SqliteStateRepository {
    /// Wraps an already migrated connection.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self { conn })
    }

    /// Opens the planner file at `path`, creating and migrating it as needed.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens a throwaway in-memory store.
    pub fn open_in_memory() -> RepoResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    /// Raw JSON text currently stored under `STATE_KEY`.
    pub fn raw_record(&self) -> RepoResult<Option<String>> {
        let raw = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [STATE_KEY],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(raw)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl StateRepository for SqliteStateRepository {
    fn load_state(&self) -> RepoResult<Option<StateTree>> {
        match self.raw_record()? {
            Some(raw) => decode_state(&raw).map(Some),
            None => Ok(None),
        }
    }

    fn save_state(&self, tree: &StateTree) -> RepoResult<()> {
        let raw = encode_state(tree)?;
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![STATE_KEY, raw],
        )?;
        debug!(
            "event=state_save module=repo status=ok backend=sqlite bytes={}",
            raw.len()
        );
        Ok(())
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = 'kv_store'
        );",
        [],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(RepoError::MissingRequiredTable("kv_store"));
    }
    Ok(())
}
