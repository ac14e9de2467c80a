//! Map raw search documents onto `books` rows.
//!
//! Every rule here is lossy on purpose: values that don't fit the column are
//! truncated, and values that don't parse become NULL rather than failing
//! the batch.

use bookharvest_db::BookRecord;
use bookharvest_hardcover::SearchDocument;
use serde_json::Value;

pub const TITLE_MAX_CHARS: usize = 255;
pub const AUTHOR_MAX_CHARS: usize = 255;
pub const ISBN_MAX_CHARS: usize = 20;
pub const COVER_URL_MAX_CHARS: usize = 500;
pub const PRIMARY_GENRE_MAX_CHARS: usize = 100;

/// Stored when a document lists no authors.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Normalize one document. Returns `None` when it has no identifier.
pub fn normalize_document(doc: &SearchDocument) -> Option<BookRecord> {
    let hardcover_id = doc.identifier()?.to_string();

    Some(BookRecord {
        hardcover_id,
        title: doc
            .title
            .as_deref()
            .map(|t| truncate_chars(t, TITLE_MAX_CHARS))
            .filter(|t| !t.is_empty()),
        author: author_display(&doc.author_names),
        isbn: doc
            .isbns
            .first()
            .map(|isbn| truncate_chars(isbn, ISBN_MAX_CHARS)),
        average_rating: doc.rating.as_ref().and_then(parse_rating),
        description: doc.description.as_ref().and_then(value_to_text),
        cover_image_url: doc
            .image_url()
            .filter(|url| !url.is_empty())
            .map(|url| truncate_chars(url, COVER_URL_MAX_CHARS)),
        primary_genre: doc
            .genres
            .first()
            .and_then(|g| g.as_deref())
            .filter(|g| !g.is_empty())
            .map(|g| truncate_chars(g, PRIMARY_GENRE_MAX_CHARS)),
        pages: doc.pages.as_ref().and_then(parse_pages),
        genres: association_candidates(doc),
    })
}

/// Normalize a batch, dropping documents without identifiers.
pub fn normalize_documents(docs: &[SearchDocument]) -> Vec<BookRecord> {
    docs.iter()
        .filter_map(|doc| {
            let record = normalize_document(doc);
            if record.is_none() {
                log::warn!("Skipping document without an identifier: {:?}", doc.title);
            }
            record
        })
        .collect()
}

/// Take at most `max` characters (not bytes) from `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Comma-join the non-empty author names, or fall back to [`UNKNOWN_AUTHOR`].
fn author_display(names: &[String]) -> String {
    let present: Vec<&str> = names
        .iter()
        .map(String::as_str)
        .filter(|n| !n.is_empty())
        .collect();
    if present.is_empty() {
        UNKNOWN_AUTHOR.to_string()
    } else {
        truncate_chars(&present.join(", "), AUTHOR_MAX_CHARS)
    }
}

/// Ratings arrive as numbers or numeric strings.
fn parse_rating(value: &Value) -> Option<f64> {
    let rating = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    rating.is_finite().then_some(rating)
}

/// Page counts arrive as integers, floats (truncated), or integer strings.
fn parse_pages(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Strings are kept as-is; other non-null values are stored as their JSON text.
fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Trimmed, non-empty string genres in index order.
fn association_candidates(doc: &SearchDocument) -> Vec<String> {
    doc.genres
        .iter()
        .filter_map(|g| g.as_deref())
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}
