//! Drive collection, normalization, and persistence across genres.
//!
//! Everything is sequential: one genre at a time, one batch write per genre.
//! The first collection or storage failure aborts the remaining run.

use bookharvest_db::{BatchStats, BookRepository, OperationError};
use bookharvest_hardcover::{CollectOptions, SearchError, SearchPages, StopReason, collect_genre};
use thiserror::Error;

use crate::normalize::normalize_documents;
use crate::progress::IngestProgress;
use crate::settings::{CollectSettings, Sweep};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Search failed for genre '{genre}': {source}")]
    Search {
        genre: String,
        #[source]
        source: SearchError,
    },
    #[error("Storing genre '{genre}' failed: {source}")]
    Db {
        genre: String,
        #[source]
        source: OperationError,
    },
}

impl IngestError {
    /// The genre being ingested when the run failed.
    pub fn genre(&self) -> &str {
        match self {
            Self::Search { genre, .. } | Self::Db { genre, .. } => genre,
        }
    }
}

/// Outcome of ingesting one genre.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreReport {
    pub genre: String,
    /// Documents accepted by the collector.
    pub fetched: usize,
    pub pages_fetched: u32,
    pub stop: StopReason,
    pub stats: BatchStats,
}

/// Running totals over any number of genres.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestTotals {
    pub genres: usize,
    pub fetched: usize,
    pub processed: u64,
    pub new_books: u64,
    pub associations_added: u64,
}

impl IngestTotals {
    pub fn add(&mut self, report: &GenreReport) {
        self.genres += 1;
        self.fetched += report.fetched;
        self.processed += report.stats.processed;
        self.new_books += report.stats.new_books;
        self.associations_added += report.stats.associations_added;
    }
}

/// Per-genre reports plus totals for a whole run.
#[derive(Debug, Default, Clone)]
pub struct IngestSummary {
    pub reports: Vec<GenreReport>,
    pub totals: IngestTotals,
}

impl IngestSummary {
    fn push(&mut self, report: GenreReport) {
        self.totals.add(&report);
        self.reports.push(report);
    }

    fn extend(&mut self, other: IngestSummary) {
        for report in other.reports {
            self.push(report);
        }
    }
}

/// Collect, normalize, and store one genre.
pub async fn ingest_genre<S, R>(
    source: &S,
    repo: &R,
    genre: &str,
    options: &CollectOptions,
) -> Result<GenreReport, IngestError>
where
    S: SearchPages,
    R: BookRepository + ?Sized,
{
    let collected = collect_genre(source, genre, options)
        .await
        .map_err(|source| IngestError::Search {
            genre: genre.to_string(),
            source,
        })?;

    let records = normalize_documents(&collected.documents);
    let stats = repo.write_batch(&records).map_err(|source| IngestError::Db {
        genre: genre.to_string(),
        source,
    })?;

    log::debug!(
        "{}: {} fetched, {} processed, {} new, {} associations",
        genre,
        collected.documents.len(),
        stats.processed,
        stats.new_books,
        stats.associations_added,
    );

    Ok(GenreReport {
        genre: genre.to_string(),
        fetched: collected.documents.len(),
        pages_fetched: collected.pages_fetched,
        stop: collected.stop,
        stats,
    })
}

/// Ingest each genre in order with the same collector options.
pub async fn ingest_genres<S, R, G>(
    source: &S,
    repo: &R,
    genres: &[G],
    options: &CollectOptions,
    progress: &dyn IngestProgress,
) -> Result<IngestSummary, IngestError>
where
    S: SearchPages,
    R: BookRepository + ?Sized,
    G: AsRef<str>,
{
    let mut summary = IngestSummary::default();
    let total = genres.len();

    for (index, genre) in genres.iter().enumerate() {
        let genre = genre.as_ref().trim();
        if genre.is_empty() {
            continue;
        }
        progress.on_genre_start(genre, index + 1, total);
        let report = ingest_genre(source, repo, genre, options).await?;
        progress.on_genre_done(&report);
        summary.push(report);
    }

    Ok(summary)
}

/// Run every sweep in order and return the combined summary.
pub async fn run_sweeps<S, R>(
    source: &S,
    repo: &R,
    sweeps: &[Sweep],
    collect: &CollectSettings,
    progress: &dyn IngestProgress,
) -> Result<IngestSummary, IngestError>
where
    S: SearchPages,
    R: BookRepository + ?Sized,
{
    let mut summary = IngestSummary::default();

    for sweep in sweeps {
        progress.on_sweep_start(sweep);
        let options = collect.options_for(sweep.per_genre);
        let result = ingest_genres(source, repo, &sweep.genres, &options, progress).await?;
        progress.on_sweep_done(&sweep.name, &result.totals);
        summary.extend(result);
    }

    Ok(summary)
}
