//! Embedding seam and vector serialization.
//!
//! The store never computes embeddings itself. It calls an [`Embedder`] and
//! persists the resulting vectors as JSON arrays, which is also the text form
//! sqlite-vec accepts for `float[N]` columns.

use crate::error::{Error, Result};
use std::sync::Mutex;

/// Text embedded once at construction to learn the vector width.
pub const PROBE_TEXT: &str = "This is a dummy text";

/// Trait for generating text embeddings.
///
/// Implementations must return vectors of the same length for every call.
pub trait Embedder: Send + Sync {
    /// Generate embeddings for a batch of documents.
    fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Generate the embedding for a single query string.
    fn embed_query(&self, text: &str) -> Result<Vec<f32>>;
}

/// Determine the embedding width by embedding [`PROBE_TEXT`].
pub fn probe_dimensionality(embedder: &dyn Embedder) -> Result<usize> {
    let dimensionality = embedder.embed_query(PROBE_TEXT)?.len();
    if dimensionality == 0 {
        return Err(Error::Embedding(
            "embedder returned a zero-length vector".to_string(),
        ));
    }
    tracing::debug!(dimensionality, "probed embedding dimensionality");
    Ok(dimensionality)
}

/// Serialize a vector to the JSON array text stored in the database.
pub fn vector_to_json(vector: &[f32]) -> Result<String> {
    // serde_json writes NaN and infinities as `null`, which would not round-trip
    if let Some(pos) = vector.iter().position(|v| !v.is_finite()) {
        return Err(Error::Serialization(format!(
            "non-finite value {} at index {}",
            vector[pos], pos
        )));
    }
    Ok(serde_json::to_string(vector)?)
}

/// Parse a vector from its stored JSON array text.
pub fn vector_from_json(json: &str) -> Result<Vec<f32>> {
    Ok(serde_json::from_str(json)?)
}

/// Deterministic embedder for tests and offline use.
///
/// Every distinct text gets an index in the order it is first seen, and its
/// vector is `dimensions - 1` ones followed by that index. Equal texts map to
/// equal vectors and texts seen later are farther from texts seen earlier.
pub struct FakeEmbeddings {
    dimensions: usize,
    seen: Mutex<Vec<String>>,
}

impl FakeEmbeddings {
    /// Create a fake embedder producing vectors of the given width (at least 1).
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn vector_for(&self, seen: &mut Vec<String>, text: &str) -> Vec<f32> {
        let index = match seen.iter().position(|t| t == text) {
            Some(index) => index,
            None => {
                seen.push(text.to_string());
                seen.len() - 1
            }
        };
        let mut vector = vec![1.0; self.dimensions - 1];
        vector.push(index as f32);
        vector
    }
}

impl Default for FakeEmbeddings {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Embedder for FakeEmbeddings {
    fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut seen = self
            .seen
            .lock()
            .map_err(|e| Error::Embedding(e.to_string()))?;
        Ok(texts
            .iter()
            .map(|text| self.vector_for(&mut seen, text))
            .collect())
    }

    fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let mut seen = self
            .seen
            .lock()
            .map_err(|e| Error::Embedding(e.to_string()))?;
        Ok(self.vector_for(&mut seen, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyEmbedder;

    impl Embedder for EmptyEmbedder {
        fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| Vec::new()).collect())
        }

        fn embed_query(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_probe_dimensionality() {
        let embedder = FakeEmbeddings::new(7);
        assert_eq!(probe_dimensionality(&embedder).unwrap(), 7);
    }

    #[test]
    fn test_probe_rejects_empty_vector() {
        let err = probe_dimensionality(&EmptyEmbedder).unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }

    #[test]
    fn test_fake_embeddings_are_consistent() {
        let embedder = FakeEmbeddings::new(4);
        let docs = embedder.embed_documents(&["foo", "bar", "foo"]).unwrap();
        assert_eq!(docs[0], vec![1.0, 1.0, 1.0, 0.0]);
        assert_eq!(docs[1], vec![1.0, 1.0, 1.0, 1.0]);
        assert_eq!(docs[0], docs[2]);
        assert_eq!(embedder.embed_query("bar").unwrap(), docs[1]);
        assert_eq!(embedder.embed_query("baz").unwrap()[3], 2.0);
    }

    #[test]
    fn test_vector_json_round_trip() {
        let vector = vec![0.1_f32, -2.5, 1e-7, 3.4028235e38, 0.0];
        let json = vector_to_json(&vector).unwrap();
        assert_eq!(vector_from_json(&json).unwrap(), vector);
    }

    #[test]
    fn test_vector_json_rejects_non_finite() {
        assert!(matches!(
            vector_to_json(&[1.0, f32::NAN]),
            Err(Error::Serialization(_))
        ));
        assert!(matches!(
            vector_to_json(&[f32::INFINITY]),
            Err(Error::Serialization(_))
        ));
    }
}
