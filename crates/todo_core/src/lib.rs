//! Core domain logic for the todo service.
//! This crate is the single source of truth for todo invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, LoggingError};
pub use model::todo::{validate_title, Todo, TodoId, TodoPatch, TodoStatus, TodoValidationError};
pub use repo::file_repo::FileTodoRepository;
pub use repo::memory_repo::MemoryTodoRepository;
pub use repo::sqlite_repo::SqliteTodoRepository;
pub use repo::todo_repo::{RepoError, RepoResult, TodoRepository};
pub use repo::{open_repository, StoreKind};
pub use service::todo_service::{TitlePolicy, TodoService};

