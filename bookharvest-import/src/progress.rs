//! Ingestion progress reporting.

use crate::ingest::{GenreReport, IngestTotals};
use crate::settings::Sweep;

/// Trait for receiving ingestion progress updates.
pub trait IngestProgress {
    /// Called before the first genre of a sweep.
    fn on_sweep_start(&self, sweep: &Sweep);

    /// Called before a genre is collected. `index` is 1-based within the sweep.
    fn on_genre_start(&self, genre: &str, index: usize, total: usize);

    /// Called after a genre's batch has been written.
    fn on_genre_done(&self, report: &GenreReport);

    /// Called after the last genre of a sweep.
    fn on_sweep_done(&self, name: &str, totals: &IngestTotals);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl IngestProgress for SilentProgress {
    fn on_sweep_start(&self, _sweep: &Sweep) {}
    fn on_genre_start(&self, _genre: &str, _index: usize, _total: usize) {}
    fn on_genre_done(&self, _report: &GenreReport) {}
    fn on_sweep_done(&self, _name: &str, _totals: &IngestTotals) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl IngestProgress for LogProgress {
    fn on_sweep_start(&self, sweep: &Sweep) {
        log::info!(
            "Sweep '{}': {} genres, up to {} books each",
            sweep.name,
            sweep.genres.len(),
            sweep.per_genre
        );
    }

    fn on_genre_start(&self, genre: &str, index: usize, total: usize) {
        log::info!("  [{}/{}] {}", index, total, genre);
    }

    fn on_genre_done(&self, report: &GenreReport) {
        log::info!(
            "  {}: {} fetched, {} new of {} processed, {} associations",
            report.genre,
            report.fetched,
            report.stats.new_books,
            report.stats.processed,
            report.stats.associations_added
        );
    }

    fn on_sweep_done(&self, name: &str, totals: &IngestTotals) {
        log::info!(
            "Sweep '{}' done: {} processed, {} new",
            name,
            totals.processed,
            totals.new_books
        );
    }
}
