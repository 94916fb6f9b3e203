//! litevss Core Library
//!
//! Embedded vector-similarity store: text documents with metadata in a SQLite
//! table, their embeddings in a sqlite-vec index, and k-nearest-neighbor
//! search over them.
//!
//! ```rust,no_run
//! use litevss_core::{FakeEmbeddings, SqliteVss, StoreConfig};
//! use std::sync::Arc;
//!
//! # fn example() -> litevss_core::Result<()> {
//! let config = StoreConfig::new("vss.db").with_table("notes");
//! let store = SqliteVss::open(&config, Arc::new(FakeEmbeddings::default()))?;
//! store.add_texts(&["foo", "bar", "baz"], None)?;
//! let _hits = store.similarity_search_with_score("foo", 2)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod storage;

#[cfg(test)]
pub mod testutils;

pub use config::{ExtensionSource, Location, StoreConfig};
pub use document::{Document, Metadata, StoredRecord};
pub use embedding::{probe_dimensionality, Embedder, FakeEmbeddings};
pub use error::{Error, Result};
pub use storage::{SqliteVss, TableName, VectorStore};
