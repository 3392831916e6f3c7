//! Persistent key/value todo store backed by one JSON document.
//!
//! # Responsibility
//! - Persist the whole todo collection as a single value on disk.
//! - Read legacy documents that hold only a bare todo array.
//!
//! # Invariants
//! - Every operation loads the whole document; every mutation rewrites it.
//! - Rewrites go through a temp file and rename, so readers never observe a
//!   half-written document.
//! - Load-mutate-save cycles are serialized by a process-local mutex. Two
//!   processes sharing one file are not coordinated.
//! - A missing or blank file is an empty collection.

use super::collection::TodoCollection;
use super::todo_repo::{RepoError, RepoResult, TodoRepository};
use crate::model::todo::{Todo, TodoId, TodoPatch};
use log::{debug, error};
use serde::Deserialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;

/// On-disk layouts accepted when loading.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredDocument {
    Current(TodoCollection),
    Legacy(Vec<Todo>),
}

/// JSON-file todo store.
#[derive(Debug)]
pub struct FileTodoRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileTodoRepository {
    /// Binds the store to `path` without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, ()>> {
        self.write_lock.lock().map_err(|_| RepoError::LockPoisoned)
    }

    fn load(&self) -> RepoResult<TodoCollection> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(TodoCollection::default());
            }
            Err(err) => {
                error!(
                    "event=store_load module=repo status=error store=file error_code=read_failed error={err}"
                );
                return Err(err.into());
            }
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(TodoCollection::default());
        }

        let collection = match serde_json::from_slice::<StoredDocument>(&raw)? {
            StoredDocument::Current(mut collection) => {
                collection.check_loaded()?;
                collection
            }
            StoredDocument::Legacy(todos) => {
                debug!("event=store_load module=repo status=ok store=file layout=legacy");
                TodoCollection::from_todos(todos)?
            }
        };
        Ok(collection)
    }

    fn save(&self, collection: &TodoCollection) -> RepoResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut staged = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut staged, collection)?;
        staged.write_all(b"\n")?;
        staged.as_file().sync_all()?;
        staged.persist(&self.path).map_err(|err| {
            error!(
                "event=store_save module=repo status=error store=file error_code=persist_failed error={}",
                err.error
            );
            RepoError::Io(err.error)
        })?;
        Ok(())
    }

    /// Runs one read-modify-write cycle, saving only when `op` succeeds and
    /// reports a change.
    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut TodoCollection) -> RepoResult<(T, bool)>,
    ) -> RepoResult<T> {
        let _guard = self.lock()?;
        let mut collection = self.load()?;
        let (output, changed) = op(&mut collection)?;
        if changed {
            self.save(&collection)?;
        }
        Ok(output)
    }
}

impl TodoRepository for FileTodoRepository {
    fn list(&self, filter: Option<bool>) -> RepoResult<Vec<Todo>> {
        let _guard = self.lock()?;
        Ok(self.load()?.list(filter))
    }

    fn get(&self, id: TodoId) -> RepoResult<Option<Todo>> {
        let _guard = self.lock()?;
        Ok(self.load()?.get(id))
    }

    fn create(&self, title: &str) -> RepoResult<Todo> {
        self.mutate(|collection| Ok((collection.create(title)?, true)))
    }

    fn update(&self, id: TodoId, patch: &TodoPatch) -> RepoResult<Option<Todo>> {
        self.mutate(|collection| {
            let updated = collection.update(id, patch);
            let changed = updated.is_some();
            Ok((updated, changed))
        })
    }

    fn delete(&self, id: TodoId) -> RepoResult<bool> {
        self.mutate(|collection| {
            let removed = collection.delete(id);
            Ok((removed, removed))
        })
    }
}
