//! Page through the genre search until enough matching documents are found.

use std::collections::HashSet;

use tokio::time::Duration;

use crate::client::SearchPages;
use crate::error::SearchError;
use crate::types::SearchDocument;

/// Default page size requested from the search endpoint.
pub const DEFAULT_PER_PAGE: u32 = 50;
/// Default page budget per genre.
pub const DEFAULT_MAX_PAGES: u32 = 50;
/// Default pause between pages.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(1100);

/// Limits for collecting one genre.
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Maximum number of documents to return.
    pub target: usize,
    pub per_page: u32,
    pub max_pages: u32,
    /// Fixed pause between consecutive page requests.
    pub page_delay: Duration,
}

impl CollectOptions {
    pub fn new(target: usize) -> Self {
        Self {
            target,
            per_page: DEFAULT_PER_PAGE,
            max_pages: DEFAULT_MAX_PAGES,
            page_delay: DEFAULT_PAGE_DELAY,
        }
    }
}

/// Why collection for a genre stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The target count was reached.
    TargetReached,
    /// A page came back with no hits.
    Exhausted,
    /// `max_pages` pages were read without reaching the target.
    PageLimit,
}

/// Documents accepted for one genre, in relevance order.
#[derive(Debug, Clone)]
pub struct Collected {
    pub documents: Vec<SearchDocument>,
    pub pages_fetched: u32,
    pub stop: StopReason,
}

/// Collect up to `options.target` documents tagged with `genre`.
///
/// Pages are requested one at a time starting at 1. A hit is accepted only
/// when its document has an identifier not yet accepted in this run and its
/// genre list contains `genre` (case-insensitive, trimmed). No further page
/// is requested once the target is met. Returning fewer documents than the
/// target is not an error.
pub async fn collect_genre<S: SearchPages>(
    source: &S,
    genre: &str,
    options: &CollectOptions,
) -> Result<Collected, SearchError> {
    let mut documents = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut pages_fetched = 0;

    if options.target == 0 {
        return Ok(Collected {
            documents,
            pages_fetched,
            stop: StopReason::TargetReached,
        });
    }

    for page in 1..=options.max_pages {
        let hits = source.search_page(genre, options.per_page, page).await?;
        pages_fetched = page;

        if hits.is_empty() {
            log::debug!("'{}': page {} is empty, results exhausted", genre, page);
            return Ok(Collected {
                documents,
                pages_fetched,
                stop: StopReason::Exhausted,
            });
        }

        let mut accepted = 0usize;
        for hit in hits {
            let Some(doc) = hit.into_document() else {
                continue;
            };
            let Some(id) = doc.identifier() else {
                continue;
            };
            if seen.contains(id) || !doc.has_genre(genre) {
                continue;
            }

            seen.insert(id.to_string());
            documents.push(doc);
            accepted += 1;

            if documents.len() >= options.target {
                log::debug!(
                    "'{}': target of {} reached on page {}",
                    genre,
                    options.target,
                    page
                );
                return Ok(Collected {
                    documents,
                    pages_fetched,
                    stop: StopReason::TargetReached,
                });
            }
        }

        log::debug!(
            "'{}': page {} accepted {} (total {}/{})",
            genre,
            page,
            accepted,
            documents.len(),
            options.target,
        );

        if page < options.max_pages && !options.page_delay.is_zero() {
            tokio::time::sleep(options.page_delay).await;
        }
    }

    Ok(Collected {
        documents,
        pages_fetched,
        stop: StopReason::PageLimit,
    })
}
