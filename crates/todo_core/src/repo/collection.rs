//! Whole-collection todo state shared by the volatile and file stores.
//!
//! Both stores hold one `TodoCollection` and run read-modify-write cycles
//! against it under a mutex; this type only implements the list semantics.

use super::todo_repo::{RepoError, RepoResult};
use crate::model::todo::{Todo, TodoId, TodoPatch};
use serde::{Deserialize, Serialize};

const FIRST_ID: TodoId = 1;

/// Insertion-ordered todos plus the next id to hand out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct TodoCollection {
    pub(crate) next_id: TodoId,
    pub(crate) todos: Vec<Todo>,
}

impl Default for TodoCollection {
    fn default() -> Self {
        Self {
            next_id: FIRST_ID,
            todos: Vec::new(),
        }
    }
}

impl TodoCollection {
    /// Rebuilds a collection from bare todos, continuing after the highest id.
    pub(crate) fn from_todos(todos: Vec<Todo>) -> RepoResult<Self> {
        let mut collection = Self {
            next_id: FIRST_ID,
            todos,
        };
        collection.check_loaded()?;
        Ok(collection)
    }

    /// Validates ids read from disk and raises `next_id` above every stored
    /// id if the document under-reports it.
    ///
    /// `next_id` saturates at `TodoId::MAX`; `create` never hands that value
    /// out, so a saturated collection stays readable but refuses new todos.
    pub(crate) fn check_loaded(&mut self) -> RepoResult<()> {
        if let Some(todo) = self.todos.iter().find(|todo| todo.id < FIRST_ID) {
            return Err(RepoError::InvalidData(format!(
                "non-positive todo id `{}` in stored document",
                todo.id
            )));
        }

        let floor = self
            .todos
            .iter()
            .map(|todo| todo.id.saturating_add(1))
            .max()
            .unwrap_or(FIRST_ID);
        self.next_id = self.next_id.max(floor).max(FIRST_ID);
        Ok(())
    }

    pub(crate) fn list(&self, filter: Option<bool>) -> Vec<Todo> {
        self.todos
            .iter()
            .filter(|todo| todo.matches(filter))
            .cloned()
            .collect()
    }

    pub(crate) fn get(&self, id: TodoId) -> Option<Todo> {
        self.todos.iter().find(|todo| todo.id == id).cloned()
    }

    /// Appends a pending todo; leaves the collection untouched when the id
    /// space is exhausted.
    pub(crate) fn create(&mut self, title: &str) -> RepoResult<Todo> {
        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .ok_or_else(|| RepoError::InvalidData("todo id space exhausted".to_string()))?;
        let todo = Todo::new(id, title);
        self.todos.push(todo.clone());
        Ok(todo)
    }

    pub(crate) fn update(&mut self, id: TodoId, patch: &TodoPatch) -> Option<Todo> {
        let todo = self.todos.iter_mut().find(|todo| todo.id == id)?;
        patch.apply_to(todo);
        Some(todo.clone())
    }

    pub(crate) fn delete(&mut self, id: TodoId) -> bool {
        match self.todos.iter().position(|todo| todo.id == id) {
            Some(index) => {
                // `remove` keeps the remaining todos in insertion order.
                self.todos.remove(index);
                true
            }
            None => false,
        }
    }
}
