//! Read queries for the catalog database.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::operations::OperationError;
use crate::types::{BookRow, GenreRow};

// ── Book Lookups ────────────────────────────────────────────────────────────

/// Find a stored book by its Hardcover identifier.
pub fn find_book(conn: &Connection, hardcover_id: &str) -> Result<Option<BookRow>, OperationError> {
    conn.query_row(
        "SELECT hardcover_id, title, author, isbn, average_rating, description,
                cover_image_url, primary_genre, pages, created_at, updated_at
         FROM books WHERE hardcover_id = ?1",
        params![hardcover_id],
        row_to_book,
    )
    .optional()
    .map_err(Into::into)
}

/// Names of the genres associated with a book, alphabetically.
pub fn genres_for_book(conn: &Connection, hardcover_id: &str) -> Result<Vec<String>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT g.genre_name
         FROM book_genres bg JOIN genres g ON g.genre_id = bg.genre_id
         WHERE bg.hardcover_id = ?1
         ORDER BY g.genre_name",
    )?;
    let rows = stmt.query_map(params![hardcover_id], |row| row.get(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Books associated with a genre, ordered by rating (unrated last) then title.
pub fn books_for_genre(
    conn: &Connection,
    genre_name: &str,
    limit: Option<u32>,
) -> Result<Vec<BookRow>, OperationError> {
    let limit = limit.map(i64::from).unwrap_or(-1);
    let mut stmt = conn.prepare(
        "SELECT b.hardcover_id, b.title, b.author, b.isbn, b.average_rating, b.description,
                b.cover_image_url, b.primary_genre, b.pages, b.created_at, b.updated_at
         FROM books b
         JOIN book_genres bg ON bg.hardcover_id = b.hardcover_id
         JOIN genres g ON g.genre_id = bg.genre_id
         WHERE g.genre_name = ?1
         ORDER BY b.average_rating IS NULL, b.average_rating DESC, b.title
         LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![genre_name, limit], row_to_book)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Genre Queries ───────────────────────────────────────────────────────────

/// List all reference genres by name.
pub fn list_genres(conn: &Connection) -> Result<Vec<GenreRow>, OperationError> {
    let mut stmt = conn.prepare("SELECT genre_id, genre_name FROM genres ORDER BY genre_name")?;
    let rows = stmt.query_map([], |row| {
        Ok(GenreRow {
            genre_id: row.get(0)?,
            genre_name: row.get(1)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Statistics ──────────────────────────────────────────────────────────────

/// Get overall catalog statistics.
pub fn catalog_stats(conn: &Connection) -> Result<CatalogStats, OperationError> {
    let books: i64 = conn.query_row("SELECT COUNT(*) FROM books", [], |r| r.get(0))?;
    let genres: i64 = conn.query_row("SELECT COUNT(*) FROM genres", [], |r| r.get(0))?;
    let associations: i64 = conn.query_row("SELECT COUNT(*) FROM book_genres", [], |r| r.get(0))?;
    let unrated: i64 = conn.query_row(
        "SELECT COUNT(*) FROM books WHERE average_rating IS NULL",
        [],
        |r| r.get(0),
    )?;

    Ok(CatalogStats {
        books,
        genres,
        associations,
        unrated,
    })
}

/// Summary statistics for the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStats {
    pub books: i64,
    pub genres: i64,
    pub associations: i64,
    pub unrated: i64,
}

// ── Row Mappers ─────────────────────────────────────────────────────────────

fn row_to_book(row: &Row) -> rusqlite::Result<BookRow> {
    Ok(BookRow {
        hardcover_id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        isbn: row.get(3)?,
        average_rating: row.get(4)?,
        description: row.get(5)?,
        cover_image_url: row.get(6)?,
        primary_genre: row.get(7)?,
        pages: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}
