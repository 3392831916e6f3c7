//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define one todo contract shared by every backing store.
//! - Select the backing store once, at process start.
//!
//! # Invariants
//! - Each store serializes its own writers; callers may share one instance
//!   across threads.
//! - Repository APIs report absence as values and storage failures as
//!   `RepoError`.

mod collection;
pub mod file_repo;
pub mod memory_repo;
pub mod sqlite_repo;
pub mod todo_repo;

use file_repo::FileTodoRepository;
use log::info;
use memory_repo::MemoryTodoRepository;
use sqlite_repo::SqliteTodoRepository;
use std::path::PathBuf;
use todo_repo::{RepoResult, TodoRepository};

/// Backing store selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    /// Volatile process memory.
    Memory,
    /// Whole-collection JSON document at the given path.
    File(PathBuf),
    /// SQLite database file at the given path.
    Sqlite(PathBuf),
}

impl StoreKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File(_) => "file",
            Self::Sqlite(_) => "sqlite",
        }
    }
}

/// Opens the repository implementation for `kind`.
///
/// # Side effects
/// - `Sqlite` creates and migrates the database file.
/// - `File` does not touch disk until the first mutation.
pub fn open_repository(kind: &StoreKind) -> RepoResult<Box<dyn TodoRepository>> {
    let repo: Box<dyn TodoRepository> = match kind {
        StoreKind::Memory => Box::new(MemoryTodoRepository::new()),
        StoreKind::File(path) => Box::new(FileTodoRepository::new(path.clone())),
        StoreKind::Sqlite(path) => Box::new(SqliteTodoRepository::open(path)?),
    };
    info!("event=store_open module=repo status=ok store={}", kind.name());
    Ok(repo)
}
