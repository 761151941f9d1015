use execlog_core::db::migrations::latest_version;
use execlog_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in ["students", "languages", "tasks", "records"] {
        assert_table_exists(&conn, table);
    }
    assert_index_exists(&conn, "idx_records_created_at");
}

#[test]
fn foreign_keys_are_enforced() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);

    let err = conn.execute(
        "INSERT INTO records (student_id, language_id, task_id, execution_time, created_at)
         VALUES (1, 1, 1, 10, '2024-03-15 14:30:00');",
        [],
    );
    assert!(err.is_err());
}

#[test]
fn reopening_file_database_keeps_data_and_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("execlog.db");

    let conn = open_db(&path).unwrap();
    conn.execute("INSERT INTO languages (name) VALUES ('Rust');", [])
        .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM languages;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, name: &str) {
    assert!(sqlite_object_exists(conn, "table", name), "table {name} does not exist");
}

fn assert_index_exists(conn: &Connection, name: &str) {
    assert!(sqlite_object_exists(conn, "index", name), "index {name} does not exist");
}

fn sqlite_object_exists(conn: &Connection, kind: &str, name: &str) -> bool {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    exists == 1
}
