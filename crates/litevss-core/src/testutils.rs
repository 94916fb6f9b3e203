//! Test utilities for litevss.
//!
//! Provides reusable test helpers, fixtures, and mock embedders.

use crate::config::StoreConfig;
use crate::document::Metadata;
use crate::embedding::{Embedder, FakeEmbeddings};
use crate::error::{Error, Result};
use crate::storage::SqliteVss;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Create an in-memory store over `table` with 10-dimensional fake embeddings.
pub fn test_store(table: &str) -> SqliteVss {
    let config = StoreConfig::in_memory().with_table(table);
    SqliteVss::open(&config, Arc::new(FakeEmbeddings::default()))
        .expect("Failed to create in-memory store")
}

/// Turn a JSON object literal into metadata.
pub fn metadata(value: serde_json::Value) -> Metadata {
    value
        .as_object()
        .cloned()
        .expect("metadata fixture must be a JSON object")
}

/// `[{"page": 0}, {"page": 1}, ...]`
pub fn page_metadatas(n: usize) -> Vec<Metadata> {
    (0..n)
        .map(|i| metadata(serde_json::json!({ "page": i })))
        .collect()
}

/// Embedder returning fixed vectors; the document vector can be swapped.
pub struct FixedEmbedder {
    query: Vec<f32>,
    document: Mutex<Vec<f32>>,
}

impl FixedEmbedder {
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            document: Mutex::new(vector.clone()),
            query: vector,
        }
    }

    pub fn set_document_vector(&self, vector: Vec<f32>) {
        *self.document.lock().unwrap() = vector;
    }
}

impl Embedder for FixedEmbedder {
    fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let vector = self.document.lock().unwrap().clone();
        Ok(texts.iter().map(|_| vector.clone()).collect())
    }

    fn embed_query(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(self.query.clone())
    }
}

/// Fake embedder whose document embedding can be switched to fail.
pub struct FailingEmbedder {
    inner: FakeEmbeddings,
    fail_documents: AtomicBool,
}

impl FailingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            inner: FakeEmbeddings::new(dimensions),
            fail_documents: AtomicBool::new(false),
        }
    }

    pub fn fail_documents(&self, fail: bool) {
        self.fail_documents.store(fail, Ordering::SeqCst);
    }
}

impl Embedder for FailingEmbedder {
    fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if self.fail_documents.load(Ordering::SeqCst) {
            return Err(Error::Embedding("model unavailable".to_string()));
        }
        self.inner.embed_documents(texts)
    }

    fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.inner.embed_query(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_metadatas_fixture() {
        let metas = page_metadatas(3);
        assert_eq!(metas.len(), 3);
        assert_eq!(metas[2]["page"], serde_json::json!(2));
    }

    #[test]
    fn test_failing_embedder_toggle() {
        let embedder = FailingEmbedder::new(3);
        assert!(embedder.embed_documents(&["a"]).is_ok());
        embedder.fail_documents(true);
        assert!(embedder.embed_documents(&["a"]).is_err());
        assert!(embedder.embed_query("a").is_ok());
    }
}
