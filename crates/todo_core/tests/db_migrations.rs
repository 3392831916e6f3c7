use rusqlite::Connection;
use todo_core::db::migrations::{apply_migrations, current_user_version, latest_version};
use todo_core::db::{open_db, open_db_in_memory, DbError};

fn todos_columns(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info('todos') ORDER BY cid;")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

#[test]
fn fresh_database_gets_todos_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    assert_eq!(todos_columns(&conn), vec!["id", "title", "completed"]);
}

#[test]
fn reapplying_migrations_keeps_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todos.db");

    let conn = open_db(&path).unwrap();
    conn.execute("INSERT INTO todos (title) VALUES ('kept');", [])
        .unwrap();
    drop(conn);

    let mut conn = open_db(&path).unwrap();
    apply_migrations(&mut conn).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM todos;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn newer_schema_version_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    Connection::open(&path)
        .unwrap()
        .execute_batch("PRAGMA user_version = 999;")
        .unwrap();

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version: 999,
            latest_supported,
        } => assert_eq!(latest_supported, latest_version()),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn todos_table_enforces_completed_flag_domain() {
    let conn = open_db_in_memory().unwrap();

    conn.execute("INSERT INTO todos (title) VALUES ('plain');", [])
        .unwrap();
    let completed: i64 = conn
        .query_row("SELECT completed FROM todos WHERE title = 'plain';", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(completed, 0);

    assert!(conn
        .execute("INSERT INTO todos (title, completed) VALUES ('bad', 2);", [])
        .is_err());
    assert!(conn
        .execute("INSERT INTO todos (title) VALUES (NULL);", [])
        .is_err());
}
