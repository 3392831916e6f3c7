//! Todo use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for the HTTP endpoint and other callers.
//! - Turn repository absence into `RepoError::NotFound`.
//! - Apply the configured title policy before anything is persisted.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Service layer remains storage-agnostic.
//! - Log events carry ids and counts only, never titles.

use crate::model::todo::{validate_title, Todo, TodoId, TodoPatch};
use crate::repo::todo_repo::{RepoError, RepoResult, TodoRepository};
use log::{debug, info, warn};

/// Whether empty titles are accepted.
///
/// Stores accept empty titles as-is, so `Permissive` is the default and
/// enforcement is opt-in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TitlePolicy {
    #[default]
    Permissive,
    RequireNonEmpty,
}

/// Use-case service wrapper for todo operations.
pub struct TodoService<R: TodoRepository> {
    repo: R,
    title_policy: TitlePolicy,
}

impl<R: TodoRepository> TodoService<R> {
    /// Creates a permissive service over `repo`.
    pub fn new(repo: R) -> Self {
        Self::with_title_policy(repo, TitlePolicy::default())
    }

    pub fn with_title_policy(repo: R, title_policy: TitlePolicy) -> Self {
        Self { repo, title_policy }
    }

    pub fn title_policy(&self) -> TitlePolicy {
        self.title_policy
    }

    /// Lists todos, optionally filtered by completion.
    pub fn list_todos(&self, filter: Option<bool>) -> RepoResult<Vec<Todo>> {
        let todos = self.repo.list(filter)?;
        debug!(
            "event=todo_list module=service status=ok filter={} count={}",
            filter_label(filter),
            todos.len()
        );
        Ok(todos)
    }

    /// Gets one todo or `RepoError::NotFound`.
    pub fn get_todo(&self, id: TodoId) -> RepoResult<Todo> {
        self.repo.get(id)?.ok_or(RepoError::NotFound(id))
    }

    /// Creates a pending todo.
    ///
    /// # Errors
    /// - `Validation` when the policy requires a non-empty title.
    pub fn create_todo(&self, title: &str) -> RepoResult<Todo> {
        self.check_title(title)?;
        let todo = self.repo.create(title)?;
        info!(
            "event=todo_create module=service status=ok id={} title_len={}",
            todo.id,
            todo.title.chars().count()
        );
        Ok(todo)
    }

    /// Applies a partial update.
    ///
    /// An empty patch still verifies existence and returns the current
    /// record.
    pub fn update_todo(&self, id: TodoId, patch: &TodoPatch) -> RepoResult<Todo> {
        if let Some(title) = &patch.title {
            self.check_title(title)?;
        }

        let todo = self.repo.update(id, patch)?.ok_or_else(|| {
            debug!("event=todo_update module=service status=not_found id={id}");
            RepoError::NotFound(id)
        })?;
        info!(
            "event=todo_update module=service status=ok id={} title_changed={} completed_changed={} state={}",
            id,
            patch.title.is_some(),
            patch.completed.is_some(),
            todo.status().as_str()
        );
        Ok(todo)
    }

    /// Hard-deletes a todo.
    pub fn delete_todo(&self, id: TodoId) -> RepoResult<()> {
        if !self.repo.delete(id)? {
            debug!("event=todo_delete module=service status=not_found id={id}");
            return Err(RepoError::NotFound(id));
        }
        info!("event=todo_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Inserts `(title, completed)` pairs when the store holds no todos.
    ///
    /// Returns the number of todos inserted; a non-empty store is left alone.
    pub fn seed_if_empty<'a, I>(&self, seed: I) -> RepoResult<usize>
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        if !self.repo.list(None)?.is_empty() {
            return Ok(0);
        }

        let mut inserted = 0;
        for (title, completed) in seed {
            let todo = self.repo.create(title)?;
            if completed {
                self.repo.update(todo.id, &TodoPatch::completed(true))?;
            }
            inserted += 1;
        }
        info!("event=todo_seed module=service status=ok count={inserted}");
        Ok(inserted)
    }

    fn check_title(&self, title: &str) -> RepoResult<()> {
        if self.title_policy == TitlePolicy::RequireNonEmpty {
            validate_title(title).map_err(|err| {
                warn!("event=todo_validate module=service status=rejected reason=empty_title");
                RepoError::from(err)
            })?;
        }
        Ok(())
    }
}

fn filter_label(filter: Option<bool>) -> &'static str {
    match filter {
        Some(true) => "completed",
        Some(false) => "pending",
        None => "all",
    }
}
