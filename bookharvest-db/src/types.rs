//! Row types shared by the write and read paths.

/// A normalized book ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct BookRecord {
    /// External identifier from the search index; the table's primary key.
    pub hardcover_id: String,
    pub title: Option<String>,
    pub author: String,
    pub isbn: Option<String>,
    pub average_rating: Option<f64>,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub primary_genre: Option<String>,
    pub pages: Option<i64>,
    /// Candidate genre names. Only names present in the `genres` table
    /// become associations; the rest are dropped at write time.
    pub genres: Vec<String>,
}

/// A stored book as read back from the `books` table.
#[derive(Debug, Clone, PartialEq)]
pub struct BookRow {
    pub hardcover_id: String,
    pub title: Option<String>,
    pub author: String,
    pub isbn: Option<String>,
    pub average_rating: Option<f64>,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub primary_genre: Option<String>,
    pub pages: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// A reference genre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreRow {
    pub genre_id: i64,
    pub genre_name: String,
}

/// Counts from writing one batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    /// Identifiers that were not in `books` before this batch.
    pub new_books: u64,
    /// Records written (inserted or updated).
    pub processed: u64,
    /// Genre association rows actually inserted.
    pub associations_added: u64,
}
