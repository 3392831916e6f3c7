//! Relational todo store on SQLite.
//!
//! # Responsibility
//! - Map the todo contract onto the `todos` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every contract operation is exactly one SQL statement, so concurrent
//!   callers cannot lose updates between a read and a write.
//! - Ids come from `AUTOINCREMENT` and are never reused after deletion.
//! - Listing order is primary-key order, which equals insertion order.
//! - `completed` is persisted as 0/1; any other value is rejected on read.

use super::todo_repo::{RepoError, RepoResult, TodoRepository};
use crate::db::migrations::{current_user_version, latest_version};
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::todo::{Todo, TodoId, TodoPatch};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const TODOS_TABLE: &str = "todos";
const REQUIRED_TODO_COLUMNS: &[&str] = &["id", "title", "completed"];

const TODO_COLUMNS_SQL: &str = "id, title, completed";

/// SQLite-backed todo repository.
///
/// The connection sits behind a mutex because `rusqlite::Connection` is not
/// `Sync`; statements themselves provide the atomicity.
#[derive(Debug)]
pub struct SqliteTodoRepository {
    conn: Mutex<Connection>,
}

impl SqliteTodoRepository {
    /// Wraps a connection whose schema has already been migrated.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema was
    ///   tampered with after migration.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> RepoResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| RepoError::LockPoisoned)
    }
}

impl TodoRepository for SqliteTodoRepository {
    fn list(&self, filter: Option<bool>) -> RepoResult<Vec<Todo>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {TODO_COLUMNS_SQL}
             FROM todos
             WHERE (?1 IS NULL OR completed = ?1)
             ORDER BY id ASC;"
        ))?;

        let mut rows = stmt.query(params![filter.map(bool_to_int)])?;
        let mut todos = Vec::new();
        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }

        Ok(todos)
    }

    fn get(&self, id: TodoId) -> RepoResult<Option<Todo>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {TODO_COLUMNS_SQL} FROM todos WHERE id = ?1;"
        ))?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }

        Ok(None)
    }

    fn create(&self, title: &str) -> RepoResult<Todo> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "INSERT INTO todos (title) VALUES (?1) RETURNING {TODO_COLUMNS_SQL};"
        ))?;

        let mut rows = stmt.query(params![title])?;
        if let Some(row) = rows.next()? {
            return parse_todo_row(row);
        }

        Err(RepoError::InvalidData(
            "insert into todos returned no row".to_string(),
        ))
    }

    fn update(&self, id: TodoId, patch: &TodoPatch) -> RepoResult<Option<Todo>> {
        let conn = self.lock()?;
        // COALESCE keeps the stored value for fields absent from the patch.
        let mut stmt = conn.prepare(&format!(
            "UPDATE todos
             SET
                title = COALESCE(?1, title),
                completed = COALESCE(?2, completed)
             WHERE id = ?3
             RETURNING {TODO_COLUMNS_SQL};"
        ))?;

        let mut rows = stmt.query(params![
            patch.title.as_deref(),
            patch.completed.map(bool_to_int),
            id,
        ])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }

        Ok(None)
    }

    fn delete(&self, id: TodoId) -> RepoResult<bool> {
        let conn = self.lock()?;
        let changed = conn.execute("DELETE FROM todos WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }
}

fn ensure_schema(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    if actual_version > expected_version {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: actual_version,
            latest_supported: expected_version,
        }
        .into());
    }

    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [TODOS_TABLE],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(RepoError::MissingRequiredTable(TODOS_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([TODOS_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    for &required in REQUIRED_TODO_COLUMNS {
        if !columns.iter().any(|column| column.as_str() == required) {
            return Err(RepoError::MissingRequiredColumn {
                table: TODOS_TABLE,
                column: required,
            });
        }
    }

    Ok(())
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<Todo> {
    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in todos.completed"
            )));
        }
    };

    Ok(Todo {
        id: row.get("id")?,
        title: row.get("title")?,
        completed,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
