//! Batch writers used by the ingestion run.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::operations::{self, OperationError};
use crate::schema;
use crate::types::{BatchStats, BookRecord};

/// Something that can durably store one batch of books.
pub trait BookRepository {
    /// Write the batch atomically and report new-versus-processed counts.
    fn write_batch(&self, books: &[BookRecord]) -> Result<BatchStats, OperationError>;
}

/// Writes into an already-open connection.
impl BookRepository for Connection {
    fn write_batch(&self, books: &[BookRecord]) -> Result<BatchStats, OperationError> {
        operations::write_batch(self, books)
    }
}

/// A file-backed repository that opens a fresh connection for every batch.
///
/// The connection is dropped (and closed) when the batch returns, whether
/// the write succeeded or not.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    path: PathBuf,
}

impl SqliteRepository {
    /// Open the database once to make sure it exists and has the schema.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, OperationError> {
        let path = path.into();
        schema::open_database(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a scoped connection for reads (stats, lookups).
    pub fn connect(&self) -> Result<Connection, OperationError> {
        Ok(schema::open_database(&self.path)?)
    }
}

impl BookRepository for SqliteRepository {
    fn write_batch(&self, books: &[BookRecord]) -> Result<BatchStats, OperationError> {
        if books.is_empty() {
            return Ok(BatchStats::default());
        }
        let conn = self.connect()?;
        operations::write_batch(&conn, books)
    }
}
