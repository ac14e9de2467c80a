//! SQLite persistence layer for the book catalog.
//!
//! Provides schema creation, the batch upsert used by ingestion, and read
//! queries, backed by SQLite (via rusqlite with bundled feature).

pub mod operations;
pub mod queries;
pub mod repository;
pub mod schema;
pub mod types;

pub use operations::{
    existing_book_ids, find_genre_id, insert_book_genre, insert_genre, load_genre_map,
    seed_genres, upsert_book, write_batch, OperationError,
};
pub use queries::{
    books_for_genre, catalog_stats, find_book, genres_for_book, list_genres, CatalogStats,
};
pub use repository::{BookRepository, SqliteRepository};
pub use schema::{open_database, open_memory, SchemaError};
pub use types::{BatchStats, BookRecord, BookRow, GenreRow};
