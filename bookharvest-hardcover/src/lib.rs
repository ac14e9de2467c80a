//! Client for the Hardcover GraphQL search API and the per-genre collector
//! built on top of it.

pub mod client;
pub mod collect;
pub mod config;
pub mod error;
pub mod types;

pub use client::{CheckOutcome, ConnectionCheck, HardcoverClient, SearchPages, SearchVariables};
pub use collect::{CollectOptions, Collected, StopReason, collect_genre};
pub use config::{ApiConfig, ConfigSource, ConfigSources, config_path, config_sources};
pub use error::SearchError;
pub use types::{SearchDocument, SearchHit};
