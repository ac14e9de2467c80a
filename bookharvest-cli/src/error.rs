use thiserror::Error;

/// Errors that end a harvest run.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Database could not be opened or queried
    #[error("Database error: {0}")]
    Database(String),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// A genre failed to collect or store
    #[error(transparent)]
    Ingest(#[from] bookharvest_import::IngestError),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }
}
