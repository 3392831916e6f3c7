//! Todo repository contract and error taxonomy.
//!
//! # Responsibility
//! - Define the storage-agnostic CRUD/filter contract every store implements.
//! - Classify failures into validation, not-found and storage errors.
//!
//! # Invariants
//! - Absence is a normal outcome: `get`/`update` return `Ok(None)` and
//!   `delete` returns `Ok(false)` for unknown ids.
//! - `create` assigns an id strictly greater than every id previously
//!   assigned by the same store.
//! - `update` never creates a record.
//! - Every operation either fully applies or has no effect.

use crate::db::DbError;
use crate::model::todo::{Todo, TodoId, TodoPatch, TodoValidationError};
use std::sync::Arc;
use thiserror::Error;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for todo persistence and query operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] TodoValidationError),
    #[error("todo not found: {0}")]
    NotFound(TodoId),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("todo store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("todo store document is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid persisted todo data: {0}")]
    InvalidData(String),
    #[error("todo store lock poisoned by a panicked writer")]
    LockPoisoned,
    #[error("connection schema version {actual_version} is older than required {expected_version}")]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("required table `{0}` is missing")]
    MissingRequiredTable(&'static str),
    #[error("required column `{table}.{column}` is missing")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    /// Returns whether this error comes from the backing store rather than
    /// from the caller's input.
    pub fn is_storage(&self) -> bool {
        !matches!(self, Self::Validation(_) | Self::NotFound(_))
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for todo CRUD and filter operations.
///
/// Implementations serialize their own writers, so one instance can be
/// shared across threads.
pub trait TodoRepository: Send + Sync {
    /// Lists todos in store order, optionally keeping only those whose
    /// `completed` flag equals `filter`.
    fn list(&self, filter: Option<bool>) -> RepoResult<Vec<Todo>>;
    fn get(&self, id: TodoId) -> RepoResult<Option<Todo>>;
    /// Persists a new pending todo and returns it with its assigned id.
    fn create(&self, title: &str) -> RepoResult<Todo>;
    /// Applies `patch` to an existing todo and returns the stored result.
    fn update(&self, id: TodoId, patch: &TodoPatch) -> RepoResult<Option<Todo>>;
    /// Removes a todo; returns `false` when nothing was removed.
    fn delete(&self, id: TodoId) -> RepoResult<bool>;
}

impl<R: TodoRepository + ?Sized> TodoRepository for Box<R> {
    fn list(&self, filter: Option<bool>) -> RepoResult<Vec<Todo>> {
        (**self).list(filter)
    }

    fn get(&self, id: TodoId) -> RepoResult<Option<Todo>> {
        (**self).get(id)
    }

    fn create(&self, title: &str) -> RepoResult<Todo> {
        (**self).create(title)
    }

    fn update(&self, id: TodoId, patch: &TodoPatch) -> RepoResult<Option<Todo>> {
        (**self).update(id, patch)
    }

    fn delete(&self, id: TodoId) -> RepoResult<bool> {
        (**self).delete(id)
    }
}

impl<R: TodoRepository + ?Sized> TodoRepository for Arc<R> {
    fn list(&self, filter: Option<bool>) -> RepoResult<Vec<Todo>> {
        (**self).list(filter)
    }

    fn get(&self, id: TodoId) -> RepoResult<Option<Todo>> {
        (**self).get(id)
    }

    fn create(&self, title: &str) -> RepoResult<Todo> {
        (**self).create(title)
    }

    fn update(&self, id: TodoId, patch: &TodoPatch) -> RepoResult<Option<Todo>> {
        (**self).update(id, patch)
    }

    fn delete(&self, id: TodoId) -> RepoResult<bool> {
        (**self).delete(id)
    }
}
