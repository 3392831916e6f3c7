//! Volatile in-memory todo store.
//!
//! # Responsibility
//! - Keep todos in process memory in insertion order.
//! - Serialize all reads and writes through one mutex.
//!
//! # Invariants
//! - State is lost when the repository is dropped.
//! - Titles are stored as given; empty titles are accepted here.

use super::collection::TodoCollection;
use super::todo_repo::{RepoError, RepoResult, TodoRepository};
use crate::model::todo::{Todo, TodoId, TodoPatch};
use std::sync::{Mutex, MutexGuard};

/// Mutex-guarded, insertion-ordered todo store.
#[derive(Debug, Default)]
pub struct MemoryTodoRepository {
    state: Mutex<TodoCollection>,
}

impl MemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, TodoCollection>> {
        self.state.lock().map_err(|_| RepoError::LockPoisoned)
    }
}

impl TodoRepository for MemoryTodoRepository {
    fn list(&self, filter: Option<bool>) -> RepoResult<Vec<Todo>> {
        Ok(self.lock()?.list(filter))
    }

    fn get(&self, id: TodoId) -> RepoResult<Option<Todo>> {
        Ok(self.lock()?.get(id))
    }

    fn create(&self, title: &str) -> RepoResult<Todo> {
        self.lock()?.create(title)
    }

    fn update(&self, id: TodoId, patch: &TodoPatch) -> RepoResult<Option<Todo>> {
        Ok(self.lock()?.update(id, patch))
    }

    fn delete(&self, id: TodoId) -> RepoResult<bool> {
        Ok(self.lock()?.delete(id))
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryTodoRepository;
    use crate::repo::todo_repo::TodoRepository;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn accepts_empty_title() {
        let repo = MemoryTodoRepository::new();
        let todo = repo.create("").unwrap();
        assert_eq!(repo.get(todo.id).unwrap().unwrap().title, "");
    }

    #[test]
    fn concurrent_creates_never_duplicate_ids() {
        let repo = Arc::new(MemoryTodoRepository::new());
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let repo = Arc::clone(&repo);
                thread::spawn(move || {
                    (0..25)
                        .map(|n| repo.create(&format!("w{worker}-{n}")).unwrap().id)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let ids: Vec<_> = handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect();
        let unique: HashSet<_> = ids.iter().copied().collect();

        assert_eq!(ids.len(), 200);
        assert_eq!(unique.len(), 200);
        assert_eq!(repo.list(None).unwrap().len(), 200);
    }
}
