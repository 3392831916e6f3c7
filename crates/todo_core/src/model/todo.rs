//! Todo domain model.
//!
//! # Responsibility
//! - Define the canonical todo record and its partial-update patch.
//! - Provide title validation for callers that opt into enforcement.
//!
//! # Invariants
//! - `id` is assigned by a repository and immutable afterwards.
//! - A todo is either `Pending` or `Done`; `completed` is the source of truth.
//! - Applying a patch only touches fields present in the patch.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Repository-assigned identifier, compatible with SQLite rowids.
pub type TodoId = i64;

/// Two-state lifecycle projected from `Todo::completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoStatus {
    /// `completed == false`.
    Pending,
    /// `completed == true`.
    Done,
}

impl TodoStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
        }
    }
}

/// Canonical todo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
}

impl Todo {
    /// Builds a freshly created todo; new todos always start pending.
    pub fn new(id: TodoId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            completed: false,
        }
    }

    pub fn status(&self) -> TodoStatus {
        if self.completed {
            TodoStatus::Done
        } else {
            TodoStatus::Pending
        }
    }

    /// Returns whether this todo passes an optional `completed` filter.
    pub fn matches(&self, filter: Option<bool>) -> bool {
        filter.map_or(true, |completed| self.completed == completed)
    }
}

/// Partial update for a todo.
///
/// `None` fields leave the stored value unchanged, so an empty patch is a
/// no-op rather than a reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            completed: None,
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }

    /// Writes the present fields into `todo`.
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title.clone_from(title);
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
    }
}

/// Rejection reasons for titles when enforcement is enabled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TodoValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
}

/// Checks that `title` carries at least one non-whitespace character.
pub fn validate_title(title: &str) -> Result<(), TodoValidationError> {
    if title.trim().is_empty() {
        return Err(TodoValidationError::EmptyTitle);
    }
    Ok(())
}
