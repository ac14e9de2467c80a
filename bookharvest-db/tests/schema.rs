use bookharvest_db::open_memory;
use bookharvest_db::schema::create_schema;

#[test]
fn schema_is_idempotent() {
    let conn = open_memory().unwrap();
    // Creating again should not error
    create_schema(&conn).unwrap();
}

#[test]
fn foreign_keys_enabled() {
    let conn = open_memory().unwrap();
    let fk: i32 = conn
        .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
        .unwrap();
    assert_eq!(fk, 1);
}

#[test]
fn all_tables_exist() {
    let conn = open_memory().unwrap();
    for table in ["books", "genres", "book_genres"] {
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        assert!(exists, "table '{}' should exist", table);
    }
}

#[test]
fn open_database_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("catalog.db");
    let conn = bookharvest_db::open_database(&path).unwrap();
    drop(conn);
    assert!(path.exists());
}

#[test]
fn association_requires_existing_book() {
    let conn = open_memory().unwrap();
    let genre_id = bookharvest_db::insert_genre(&conn, "Fantasy").unwrap();
    let result = bookharvest_db::insert_book_genre(&conn, "missing", genre_id);
    assert!(result.is_err());
}
