//! Write operations for books, genres, and their associations.

use std::collections::{HashMap, HashSet};

use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

use crate::types::{BatchStats, BookRecord};

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Schema error: {0}")]
    Schema(#[from] crate::schema::SchemaError),
}

// ── Genre Operations ────────────────────────────────────────────────────────

/// Insert a reference genre, returning its id. An existing name keeps its id.
pub fn insert_genre(conn: &Connection, name: &str) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT OR IGNORE INTO genres (genre_name) VALUES (?1)",
        params![name],
    )?;
    find_genre_id(conn, name)?.ok_or(OperationError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
}

/// Insert every name in `names` as a reference genre. Returns how many were new.
pub fn seed_genres<S: AsRef<str>>(conn: &Connection, names: &[S]) -> Result<usize, OperationError> {
    let tx = conn.unchecked_transaction()?;
    let mut added = 0;
    for name in names {
        let name = name.as_ref().trim();
        if name.is_empty() {
            continue;
        }
        added += tx.execute(
            "INSERT OR IGNORE INTO genres (genre_name) VALUES (?1)",
            params![name],
        )?;
    }
    tx.commit()?;
    Ok(added)
}

/// Load the reference genres as a name → id map.
pub fn load_genre_map(conn: &Connection) -> Result<HashMap<String, i64>, OperationError> {
    let mut stmt = conn.prepare("SELECT genre_id, genre_name FROM genres")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, i64>(0)?)))?;
    rows.collect::<Result<HashMap<_, _>, _>>().map_err(Into::into)
}

// ── Book Operations ─────────────────────────────────────────────────────────

/// Return the subset of `ids` already present in `books`.
pub fn existing_book_ids<'a, I>(conn: &Connection, ids: I) -> Result<HashSet<String>, OperationError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut stmt = conn.prepare("SELECT 1 FROM books WHERE hardcover_id = ?1")?;
    let mut found = HashSet::new();
    for id in ids {
        if stmt.exists(params![id])? {
            found.insert(id.to_string());
        }
    }
    Ok(found)
}

/// Insert a book, or overwrite every non-key column if it already exists.
pub fn upsert_book(conn: &Connection, book: &BookRecord) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO books (hardcover_id, title, author, isbn, average_rating,
             description, cover_image_url, primary_genre, pages)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(hardcover_id) DO UPDATE SET
             title = excluded.title,
             author = excluded.author,
             isbn = excluded.isbn,
             average_rating = excluded.average_rating,
             description = excluded.description,
             cover_image_url = excluded.cover_image_url,
             primary_genre = excluded.primary_genre,
             pages = excluded.pages,
             updated_at = datetime('now')",
        params![
            book.hardcover_id,
            book.title,
            book.author,
            book.isbn,
            book.average_rating,
            book.description,
            book.cover_image_url,
            book.primary_genre,
            book.pages,
        ],
    )?;
    Ok(())
}

/// Associate a book with a genre. Returns false if the pair already existed.
pub fn insert_book_genre(
    conn: &Connection,
    hardcover_id: &str,
    genre_id: i64,
) -> Result<bool, OperationError> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO book_genres (hardcover_id, genre_id) VALUES (?1, ?2)",
        params![hardcover_id, genre_id],
    )?;
    Ok(changed > 0)
}

// ── Batch Write ─────────────────────────────────────────────────────────────

/// Write one batch of books and their genre associations atomically.
///
/// New-versus-known is decided against the table contents before the batch
/// is applied, so an identifier repeated inside the batch is only counted
/// as new once. Genre names with no row in `genres` are skipped.
pub fn write_batch(conn: &Connection, books: &[BookRecord]) -> Result<BatchStats, OperationError> {
    let mut stats = BatchStats::default();
    if books.is_empty() {
        return Ok(stats);
    }

    let tx = conn.unchecked_transaction()?;

    let genre_map = load_genre_map(&tx)?;
    let mut known = existing_book_ids(&tx, books.iter().map(|b| b.hardcover_id.as_str()))?;

    for book in books {
        if known.insert(book.hardcover_id.clone()) {
            stats.new_books += 1;
        }

        upsert_book(&tx, book)?;

        for name in &book.genres {
            match genre_map.get(name.trim()) {
                Some(&genre_id) => {
                    if insert_book_genre(&tx, &book.hardcover_id, genre_id)? {
                        stats.associations_added += 1;
                    }
                }
                None => log::trace!("no reference genre named '{}'", name),
            }
        }

        stats.processed += 1;
    }

    tx.commit()?;

    log::debug!(
        "wrote batch: {} processed, {} new, {} associations",
        stats.processed,
        stats.new_books,
        stats.associations_added,
    );
    Ok(stats)
}

/// Look up a genre id by exact name.
pub fn find_genre_id(conn: &Connection, name: &str) -> Result<Option<i64>, OperationError> {
    conn.query_row(
        "SELECT genre_id FROM genres WHERE genre_name = ?1",
        params![name],
        |row| row.get(0),
    )
    .optional()
    .map_err(Into::into)
}
