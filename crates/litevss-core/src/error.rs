//! Error types for litevss.

use thiserror::Error;

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// litevss error types.
#[derive(Debug, Error)]
pub enum Error {
    /// The vector-search extension could not be registered, loaded or verified
    #[error("Extension load error: {0}")]
    ExtensionLoad(String),

    /// The backing database could not be opened or created
    #[error("Storage open error: {0}")]
    StorageOpen(#[source] rusqlite::Error),

    /// DDL failure while creating the document table, vector index or trigger
    #[error("Schema error: {0}")]
    Schema(String),

    /// The embedding function failed or returned something unusable
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Metadata or a vector could not be converted to or from JSON
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Insert failed in the storage layer
    #[error("Storage write error: {0}")]
    StorageWrite(#[source] rusqlite::Error),

    /// A vector does not have the table's fixed dimensionality
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Query failed in the storage layer
    #[error("Storage read error: {0}")]
    StorageRead(#[source] rusqlite::Error),

    /// Table name rejected by the identifier allow-list
    #[error("Invalid identifier {0:?}: {1}")]
    InvalidIdentifier(String, &'static str),

    /// Caller broke an argument contract (k == 0, metadata count, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A previous operation panicked while holding the connection
    #[error("Connection lock poisoned")]
    LockPoisoned,
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
