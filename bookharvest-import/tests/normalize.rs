use bookharvest_hardcover::SearchDocument;
use bookharvest_import::normalize::*;
use serde_json::{Value, json};

fn document(value: Value) -> SearchDocument {
    serde_json::from_value(value).unwrap()
}

#[test]
fn full_document_maps_every_field() {
    let doc = document(json!({
        "id": "428",
        "title": "The Left Hand of Darkness",
        "author_names": ["Ursula K. Le Guin"],
        "isbns": ["9780441478125", "0441478123"],
        "rating": 4.12,
        "description": "A lone human envoy on a winter world.",
        "image": { "url": "https://assets.example.com/428.jpg" },
        "pages": 304,
        "genres": ["Science Fiction", "Fiction", "Classics"],
    }));

    let record = normalize_document(&doc).unwrap();

    assert_eq!(record.hardcover_id, "428");
    assert_eq!(record.title.as_deref(), Some("The Left Hand of Darkness"));
    assert_eq!(record.author, "Ursula K. Le Guin");
    assert_eq!(record.isbn.as_deref(), Some("9780441478125"));
    assert_eq!(record.average_rating, Some(4.12));
    assert_eq!(
        record.description.as_deref(),
        Some("A lone human envoy on a winter world.")
    );
    assert_eq!(
        record.cover_image_url.as_deref(),
        Some("https://assets.example.com/428.jpg")
    );
    assert_eq!(record.pages, Some(304));
    assert_eq!(record.primary_genre.as_deref(), Some("Science Fiction"));
    assert_eq!(record.genres, vec!["Science Fiction", "Fiction", "Classics"]);
}

#[test]
fn long_values_are_truncated_to_column_widths() {
    let doc = document(json!({
        "id": "1",
        "title": "t".repeat(300),
        "author_names": ["a".repeat(200), "b".repeat(200)],
        "isbns": ["1234567890123456789012345"],
        "image": { "url": format!("https://x.test/{}", "p".repeat(600)) },
        "genres": ["g".repeat(150)],
    }));

    let record = normalize_document(&doc).unwrap();

    assert_eq!(record.title.unwrap().chars().count(), TITLE_MAX_CHARS);
    assert_eq!(record.author.chars().count(), AUTHOR_MAX_CHARS);
    assert_eq!(record.isbn.as_deref(), Some("12345678901234567890"));
    assert_eq!(
        record.cover_image_url.unwrap().chars().count(),
        COVER_URL_MAX_CHARS
    );
    assert_eq!(
        record.primary_genre.unwrap().chars().count(),
        PRIMARY_GENRE_MAX_CHARS
    );
}

#[test]
fn truncation_respects_multibyte_characters() {
    let doc = document(json!({ "id": "1", "title": "é".repeat(260) }));
    let title = normalize_document(&doc).unwrap().title.unwrap();
    assert_eq!(title.chars().count(), TITLE_MAX_CHARS);
    assert!(title.chars().all(|c| c == 'é'));
}

#[test]
fn missing_authors_become_unknown() {
    for authors in [json!(null), json!([]), json!(["", ""])] {
        let doc = document(json!({ "id": "1", "author_names": authors }));
        assert_eq!(normalize_document(&doc).unwrap().author, UNKNOWN_AUTHOR);
    }
}

#[test]
fn multiple_authors_are_comma_joined() {
    let doc = document(json!({
        "id": "1",
        "author_names": ["Terry Pratchett", "", "Neil Gaiman"],
    }));
    assert_eq!(
        normalize_document(&doc).unwrap().author,
        "Terry Pratchett, Neil Gaiman"
    );
}

#[test]
fn unparsable_numbers_become_absent() {
    let doc = document(json!({ "id": "1", "rating": "n/a", "pages": "lots" }));
    let record = normalize_document(&doc).unwrap();
    assert_eq!(record.average_rating, None);
    assert_eq!(record.pages, None);
}

#[test]
fn numeric_strings_and_floats_are_accepted() {
    let doc = document(json!({ "id": "1", "rating": "3.75", "pages": 211.8 }));
    let record = normalize_document(&doc).unwrap();
    assert_eq!(record.average_rating, Some(3.75));
    assert_eq!(record.pages, Some(211));
}

#[test]
fn empty_values_become_absent() {
    let doc = document(json!({
        "id": "1",
        "title": "",
        "image": { "url": "" },
        "genres": ["", "Fantasy"],
    }));
    let record = normalize_document(&doc).unwrap();
    assert_eq!(record.title, None);
    assert_eq!(record.cover_image_url, None);
    assert_eq!(record.primary_genre, None);
    assert_eq!(record.isbn, None);
    assert_eq!(record.genres, vec!["Fantasy"]);
}

#[test]
fn non_string_description_is_stored_as_text() {
    let doc = document(json!({ "id": "1", "description": { "html": "<p>hi</p>" } }));
    assert_eq!(
        normalize_document(&doc).unwrap().description.as_deref(),
        Some(r#"{"html":"<p>hi</p>"}"#)
    );
}

#[test]
fn genre_candidates_are_trimmed_strings_only() {
    let doc = document(json!({
        "id": "1",
        "genres": [" Fantasy ", 42, null, "  ", "Fiction"],
    }));
    assert_eq!(normalize_document(&doc).unwrap().genres, vec!["Fantasy", "Fiction"]);
}

#[test]
fn documents_without_identifier_are_dropped() {
    let docs = vec![
        document(json!({ "title": "No id" })),
        document(json!({ "id": "  ", "title": "Blank id" })),
        document(json!({ "id": "5", "title": "Kept" })),
    ];
    let records = normalize_documents(&docs);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].hardcover_id, "5");
}
