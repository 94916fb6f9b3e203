//! Document types returned by searches.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Arbitrary key-value metadata attached to a document.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A stored text unit as returned by the query path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// The raw text
    pub page_content: String,
    /// Metadata, `None` when the document was stored without any
    pub metadata: Option<Metadata>,
}

impl Document {
    /// Create a document without metadata.
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: None,
        }
    }

    /// Attach metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// A full row of the document table, including its stored embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub row_id: i64,
    pub document: Document,
    pub embedding: Vec<f32>,
}

/// Serialize metadata for the `metadata` column. `None` stays SQL `NULL`.
pub(crate) fn metadata_to_json(metadata: Option<&Metadata>) -> Result<Option<String>> {
    metadata
        .map(|m| serde_json::to_string(m).map_err(Into::into))
        .transpose()
}

/// Inverse of [`metadata_to_json`].
pub(crate) fn metadata_from_json(json: Option<&str>) -> Result<Option<Metadata>> {
    json.map(|s| serde_json::from_str(s).map_err(Into::into))
        .transpose()
}
