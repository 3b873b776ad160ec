// Integration tests for the migration framework

use rusqlite::Connection;
use strathouse_store::db;
use strathouse_store::migrations::apply_migrations;

fn get_table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

#[test]
fn test_apply_migrations_on_empty_db() {
    let mut conn = db::open_in_memory().unwrap();

    let result = apply_migrations(&mut conn);
    assert!(result.is_ok(), "Migrations should succeed: {:?}", result.err());

    let tables = get_table_names(&conn);
    for expected in ["schema_version", "house_config", "houses", "parts", "sqlite_sequence"] {
        assert!(
            tables.contains(&expected.to_string()),
            "Missing table: {}",
            expected
        );
    }
    assert_eq!(tables.len(), 5, "unexpected tables: {:?}", tables);
}

#[test]
fn test_migration_idempotency() {
    let mut conn = db::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    apply_migrations(&mut conn).unwrap();

    let version_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version_count, 1);
}

#[test]
fn test_schema_survives_reopen_from_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("stockhouse.db");

    {
        let mut conn = db::open(&path).unwrap();
        db::configure(&conn).unwrap();
        apply_migrations(&mut conn).unwrap();
        conn.execute(
            "INSERT INTO house_config (key, value) VALUES ('remote_cache_dir', '/x')",
            [],
        )
        .unwrap();
    }

    let mut conn = db::open(&path).unwrap();
    apply_migrations(&mut conn).unwrap();
    let value: String = conn
        .query_row(
            "SELECT value FROM house_config WHERE key = 'remote_cache_dir'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(value, "/x");
}

#[test]
fn test_house_type_is_checked() {
    let mut conn = db::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();

    let result = conn.execute(
        "INSERT INTO houses (name, house_type, local_path) VALUES ('h', 'ftp', '/h')",
        [],
    );
    assert!(result.is_err());
}
