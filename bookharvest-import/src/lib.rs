//! Turn Hardcover search results into catalog rows.
//!
//! This crate owns the ETL between the API client and the database: mapping
//! documents onto book records, loading run settings, and driving the
//! per-genre ingestion loop.

pub mod ingest;
pub mod normalize;
pub mod progress;
pub mod settings;

pub use ingest::{
    GenreReport, IngestError, IngestSummary, IngestTotals, ingest_genre, ingest_genres, run_sweeps,
};
pub use normalize::{UNKNOWN_AUTHOR, normalize_document, normalize_documents, truncate_chars};
pub use progress::{IngestProgress, LogProgress, SilentProgress};
pub use settings::{
    CollectSettings, HarvestSettings, SettingsError, SettingsFile, Sweep, default_database_path,
    default_sweeps,
};
