use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::SearchError;

/// GraphQL response envelope. Either `errors` or `data` is populated.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<Value>>,
}

impl<T> GraphQlResponse<T> {
    /// Split the envelope into its payload, turning reported errors into [`SearchError::Api`].
    pub fn into_data(self) -> Result<T, SearchError> {
        if let Some(errors) = self.errors {
            let rendered = serde_json::to_string(&errors).unwrap_or_else(|_| format!("{:?}", errors));
            return Err(SearchError::api(rendered));
        }
        self.data
            .ok_or_else(|| SearchError::UnexpectedResponse("response has neither data nor errors".to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchData {
    pub search: SearchField,
}

#[derive(Debug, Deserialize)]
pub struct SearchField {
    /// Typesense result set. The API sometimes sends it as a JSON-encoded string.
    #[serde(default)]
    pub results: Value,
}

/// The part of a Typesense result set we care about.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResults {
    #[serde(default, deserialize_with = "lenient::hits")]
    pub hits: Vec<SearchHit>,
    #[serde(default)]
    pub found: Option<u64>,
}

impl SearchResults {
    /// Decode `data.search.results`, which is either an object or a string holding JSON.
    ///
    /// Any other shape (null, number, array) is read as an empty page.
    pub fn from_value(results: Value) -> Result<Self, SearchError> {
        match results {
            Value::String(raw) => {
                let inner: Value = serde_json::from_str(&raw)?;
                match inner {
                    Value::Object(_) => Ok(serde_json::from_value(inner)?),
                    _ => Ok(Self::default()),
                }
            }
            obj @ Value::Object(_) => Ok(serde_json::from_value(obj)?),
            _ => Ok(Self::default()),
        }
    }
}

/// One entry of the `hits` array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub document: Value,
}

impl SearchHit {
    /// Parse the wrapped document. Non-object documents yield `None`.
    pub fn into_document(self) -> Option<SearchDocument> {
        match self.document {
            doc @ Value::Object(_) => serde_json::from_value(doc).ok(),
            _ => None,
        }
    }
}

/// A raw book document from the search index, before normalization.
///
/// Fields are decoded leniently: a field with an unexpected type becomes
/// empty rather than failing the whole page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SearchDocument {
    #[serde(default, deserialize_with = "lenient::scalar_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub author_names: Vec<String>,
    #[serde(default, deserialize_with = "lenient::scalar_list")]
    pub isbns: Vec<String>,
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub image: Option<Value>,
    #[serde(default)]
    pub pages: Option<Value>,
    /// Genre names in index order. Non-string entries keep their slot as `None`.
    #[serde(default, deserialize_with = "lenient::optional_string_list")]
    pub genres: Vec<Option<String>>,
}

impl SearchDocument {
    /// The document identifier, trimmed. Empty identifiers count as missing.
    pub fn identifier(&self) -> Option<&str> {
        self.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Whether the genre list contains `genre`, ignoring case and surrounding whitespace.
    pub fn has_genre(&self, genre: &str) -> bool {
        let wanted = genre.trim().to_lowercase();
        self.genres
            .iter()
            .any(|g| g.as_deref().unwrap_or("").trim().to_lowercase() == wanted)
    }

    /// `image.url`, if the image is an object carrying a string URL.
    pub fn image_url(&self) -> Option<&str> {
        self.image
            .as_ref()
            .and_then(|img| img.get("url"))
            .and_then(Value::as_str)
    }
}

/// A single row from the connectivity-check query.
#[derive(Debug, Clone, Deserialize)]
pub struct BookTitle {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BooksData {
    #[serde(default)]
    pub books: Vec<BookTitle>,
}

mod lenient {
    use super::*;

    fn scalar_to_string(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    pub fn scalar_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(scalar_to_string(&Value::deserialize(d)?))
    }

    pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn scalar_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items.iter().filter_map(scalar_to_string).collect(),
            _ => Vec::new(),
        })
    }

    pub fn optional_string_list<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Vec<Option<String>>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn hits<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<SearchHit>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| SearchHit {
                    document: match item {
                        Value::Object(mut map) => map.remove("document").unwrap_or(Value::Null),
                        _ => Value::Null,
                    },
                })
                .collect(),
            _ => Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn results_as_object() {
        let results = SearchResults::from_value(json!({
            "found": 2,
            "hits": [{"document": {"id": "1"}}, {"document": {"id": 2}}]
        }))
        .unwrap();
        assert_eq!(results.hits.len(), 2);
        assert_eq!(results.found, Some(2));
        let ids: Vec<_> = results
            .hits
            .into_iter()
            .filter_map(SearchHit::into_document)
            .map(|d| d.id.unwrap())
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn results_as_encoded_string() {
        let encoded = json!({"hits": [{"document": {"id": "7", "title": "Dune"}}]}).to_string();
        let results = SearchResults::from_value(Value::String(encoded)).unwrap();
        let doc = results.hits[0].clone().into_document().unwrap();
        assert_eq!(doc.title.as_deref(), Some("Dune"));
    }

    #[test]
    fn results_of_other_shapes_are_empty() {
        assert!(SearchResults::from_value(Value::Null).unwrap().hits.is_empty());
        assert!(SearchResults::from_value(json!([1, 2])).unwrap().hits.is_empty());
        assert!(SearchResults::from_value(json!({"hits": "nope"})).unwrap().hits.is_empty());
    }

    #[test]
    fn malformed_encoded_string_is_an_error() {
        let err = SearchResults::from_value(Value::String("{not json".to_string())).unwrap_err();
        assert!(matches!(err, SearchError::Json(_)));
    }

    #[test]
    fn non_object_documents_are_skipped() {
        let hit = SearchHit { document: json!("just a string") };
        assert!(hit.into_document().is_none());
        let hit = SearchHit { document: Value::Null };
        assert!(hit.into_document().is_none());
    }

    #[test]
    fn document_fields_decode_leniently() {
        let doc: SearchDocument = serde_json::from_value(json!({
            "id": 42,
            "title": 17,
            "author_names": ["Ursula K. Le Guin", null, 3],
            "isbns": [9780441478125u64, "0441478123"],
            "rating": "4.2",
            "pages": 304,
            "image": {"url": "https://img.example/c.jpg"},
            "genres": ["Fantasy", null, "Classics"]
        }))
        .unwrap();
        assert_eq!(doc.identifier(), Some("42"));
        assert_eq!(doc.title, None);
        assert_eq!(doc.author_names, vec!["Ursula K. Le Guin"]);
        assert_eq!(doc.isbns, vec!["9780441478125", "0441478123"]);
        assert_eq!(doc.image_url(), Some("https://img.example/c.jpg"));
        assert_eq!(
            doc.genres,
            vec![Some("Fantasy".to_string()), None, Some("Classics".to_string())]
        );
    }

    #[test]
    fn blank_identifier_counts_as_missing() {
        let doc: SearchDocument = serde_json::from_value(json!({"id": "  "})).unwrap();
        assert_eq!(doc.identifier(), None);
    }

    #[test]
    fn genre_match_ignores_case_and_whitespace() {
        let doc: SearchDocument =
            serde_json::from_value(json!({"id": "1", "genres": ["  science FICTION ", null]}))
                .unwrap();
        assert!(doc.has_genre("Science Fiction"));
        assert!(doc.has_genre(" science fiction"));
        assert!(!doc.has_genre("Science"));
    }

    #[test]
    fn errors_envelope_becomes_api_error() {
        let resp: GraphQlResponse<SearchData> =
            serde_json::from_value(json!({"errors": [{"message": "invalid token"}]})).unwrap();
        match resp.into_data() {
            Err(SearchError::Api(msg)) => assert!(msg.contains("invalid token")),
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn envelope_without_data_or_errors_is_unexpected() {
        let resp: GraphQlResponse<SearchData> = serde_json::from_value(json!({})).unwrap();
        assert!(resp.data.is_none());
        assert!(matches!(
            resp.into_data(),
            Err(SearchError::UnexpectedResponse(_))
        ));
    }
}
