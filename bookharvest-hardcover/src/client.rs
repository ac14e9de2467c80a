use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::config::ApiConfig;
use crate::error::SearchError;
use crate::types::{BooksData, GraphQlResponse, SearchData, SearchHit, SearchResults};

const SEARCH_QUERY: &str = r#"
query SearchBooks($q: String!, $per_page: Int!, $page: Int!, $fields: String!, $weights: String!, $sort: String!) {
  search(
    query: $q,
    query_type: "Book",
    per_page: $per_page,
    page: $page,
    fields: $fields,
    weights: $weights,
    sort: $sort
  ) {
    results
  }
}
"#;

/// Match against the genre field only.
const SEARCH_FIELDS: &str = "genres";
const SEARCH_WEIGHTS: &str = "10";
/// Most relevant first, then most popular.
const SEARCH_SORT: &str = "_text_match:desc,users_count:desc";

const CHECK_QUERY: &str = "{ books(limit: 5) { title } }";

/// Variables for one page of the genre search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchVariables<'a> {
    pub q: &'a str,
    pub per_page: u32,
    pub page: u32,
    pub fields: &'static str,
    pub weights: &'static str,
    pub sort: &'static str,
}

impl<'a> SearchVariables<'a> {
    pub fn for_genre(genre: &'a str, per_page: u32, page: u32) -> Self {
        Self {
            q: genre,
            per_page,
            page,
            fields: SEARCH_FIELDS,
            weights: SEARCH_WEIGHTS,
            sort: SEARCH_SORT,
        }
    }
}

/// A paged search over book documents.
///
/// [`HardcoverClient`] is the production implementation; the collector only
/// depends on this trait.
pub trait SearchPages {
    /// Fetch one page (1-based) of hits for `genre`.
    fn search_page(
        &self,
        genre: &str,
        per_page: u32,
        page: u32,
    ) -> impl Future<Output = Result<Vec<SearchHit>, SearchError>>;
}

/// What the connectivity check found.
#[derive(Debug, Clone)]
pub enum CheckOutcome {
    /// The API answered with book titles.
    Titles(Vec<String>),
    /// The API answered with an `errors` payload (pretty-printed).
    ApiErrors(String),
    /// Connected, but the response carried no books.
    NoData,
}

/// Result of [`HardcoverClient::check_connection`].
#[derive(Debug, Clone)]
pub struct ConnectionCheck {
    pub status: u16,
    pub outcome: CheckOutcome,
}

/// HTTP client for the Hardcover GraphQL API.
pub struct HardcoverClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl HardcoverClient {
    /// Build a client from an explicit config. No request is made.
    pub fn new(config: ApiConfig) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Fetch a handful of titles to prove the endpoint and token work.
    ///
    /// API-level errors are reported in the outcome, not as `Err`; only
    /// transport and decoding failures are errors.
    pub async fn check_connection(&self) -> Result<ConnectionCheck, SearchError> {
        let (status, text) = self.post(&json!({ "query": CHECK_QUERY })).await?;

        let envelope: GraphQlResponse<BooksData> = decode(status, &text)?;
        let outcome = match envelope.errors {
            Some(errors) => CheckOutcome::ApiErrors(
                serde_json::to_string_pretty(&errors).unwrap_or_else(|_| format!("{:?}", errors)),
            ),
            None => match envelope.data {
                Some(data) if !data.books.is_empty() => CheckOutcome::Titles(
                    data.books
                        .into_iter()
                        .map(|b| b.title.unwrap_or_default())
                        .collect(),
                ),
                _ => CheckOutcome::NoData,
            },
        };

        Ok(ConnectionCheck {
            status: status.as_u16(),
            outcome,
        })
    }

    /// Run one page of the genre search and return its hits.
    pub async fn search_books(
        &self,
        variables: &SearchVariables<'_>,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let body = json!({ "query": SEARCH_QUERY, "variables": variables });
        let (status, text) = self.post(&body).await?;

        let envelope: GraphQlResponse<SearchData> = decode(status, &text)?;
        let data = envelope.into_data()?;
        let results = SearchResults::from_value(data.search.results)?;

        log::debug!(
            "search '{}' page {}: {} hits (found {:?})",
            variables.q,
            variables.page,
            results.hits.len(),
            results.found,
        );
        Ok(results.hits)
    }

    async fn post(
        &self,
        body: &serde_json::Value,
    ) -> Result<(reqwest::StatusCode, String), SearchError> {
        let mut request = self.http.post(&self.config.endpoint).json(body);
        if let Some(ref auth) = self.config.authorization {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let resp = request.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        Ok((status, text))
    }
}

impl SearchPages for HardcoverClient {
    async fn search_page(
        &self,
        genre: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<SearchHit>, SearchError> {
        self.search_books(&SearchVariables::for_genre(genre, per_page, page))
            .await
    }
}

/// Decode a GraphQL body. A non-JSON body on an error status is reported as
/// a server error rather than a parse failure.
fn decode<T: DeserializeOwned>(
    status: reqwest::StatusCode,
    text: &str,
) -> Result<GraphQlResponse<T>, SearchError> {
    match serde_json::from_str(text) {
        Ok(envelope) => Ok(envelope),
        Err(e) if !status.is_success() => Err(SearchError::ServerError {
            status: status.as_u16(),
            message: format!("{e}. Response: {}", snippet(text)),
        }),
        Err(e) => Err(SearchError::UnexpectedResponse(format!(
            "{e}. Response: {}",
            snippet(text)
        ))),
    }
}

fn snippet(text: &str) -> &str {
    match text.char_indices().nth(200) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
