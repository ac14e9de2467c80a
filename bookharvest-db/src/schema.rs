//! SQLite schema creation.

use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Create all tables if they don't exist.
///
/// This is idempotent — safe to call on an existing database. Existing
/// tables are never altered.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Open or create a catalog database at the given path.
pub fn open_database(path: &std::path::Path) -> Result<Connection, SchemaError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    create_schema(&conn)?;
    Ok(conn)
}

const SCHEMA_SQL: &str = r#"
-- Reference genres, populated ahead of ingestion
CREATE TABLE IF NOT EXISTS genres (
    genre_id INTEGER PRIMARY KEY AUTOINCREMENT,
    genre_name TEXT NOT NULL UNIQUE
);

-- Books keyed by their Hardcover identifier
CREATE TABLE IF NOT EXISTS books (
    hardcover_id TEXT PRIMARY KEY,
    title TEXT,
    author TEXT NOT NULL DEFAULT 'Unknown',
    isbn TEXT,
    average_rating REAL,
    description TEXT,
    cover_image_url TEXT,
    primary_genre TEXT,
    pages INTEGER,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
CREATE INDEX IF NOT EXISTS idx_books_primary_genre ON books(primary_genre);

-- Many-to-many book/genre mapping
CREATE TABLE IF NOT EXISTS book_genres (
    hardcover_id TEXT NOT NULL REFERENCES books(hardcover_id),
    genre_id INTEGER NOT NULL REFERENCES genres(genre_id),
    PRIMARY KEY (hardcover_id, genre_id)
);
CREATE INDEX IF NOT EXISTS idx_book_genres_genre ON book_genres(genre_id);
"#;
