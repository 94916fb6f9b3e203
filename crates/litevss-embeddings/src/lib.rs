//! litevss Embeddings Library
//!
//! Local sentence embeddings via fastembed, exposed through the
//! [`Embedder`](litevss_core::Embedder) trait.

use litevss_core::{Embedder, Error, Result};
use std::sync::Mutex;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Resolve a model id to the fastembed model.
pub fn resolve_model(model_id: &str) -> Result<fastembed::EmbeddingModel> {
    use fastembed::EmbeddingModel;

    match model_id {
        "sentence-transformers/all-MiniLM-L6-v2" | "all-minilm-l6-v2" => {
            Ok(EmbeddingModel::AllMiniLML6V2)
        }
        "BAAI/bge-small-en-v1.5" | "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        "BAAI/bge-base-en-v1.5" | "bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
        "nomic-ai/nomic-embed-text-v1.5" | "nomic-embed-text-v1.5" => {
            Ok(EmbeddingModel::NomicEmbedTextV15)
        }
        other => Err(Error::Config(format!("unsupported embedding model: {other}"))),
    }
}

/// Embedding generator using fastembed.
pub struct EmbeddingGenerator {
    model: Mutex<fastembed::TextEmbedding>,
    model_id: String,
}

impl Embedder for EmbeddingGenerator {
    fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut model = self
            .model
            .lock()
            .map_err(|e| Error::Embedding(e.to_string()))?;
        let embeddings = model
            .embed(texts.to_vec(), None)
            .map_err(|e| Error::Embedding(e.to_string()))?;
        tracing::debug!(model = %self.model_id, count = embeddings.len(), "embedded documents");
        Ok(embeddings)
    }

    fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_documents(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("No embedding generated".to_string()))
    }
}

impl EmbeddingGenerator {
    /// Create a new embedding generator with the default model.
    pub fn new() -> Result<Self> {
        Self::with_model(DEFAULT_MODEL)
    }

    /// Create a new embedding generator with a specific model.
    ///
    /// The model is downloaded on first use and cached by fastembed.
    pub fn with_model(model_id: &str) -> Result<Self> {
        let model = fastembed::TextEmbedding::try_new(
            fastembed::InitOptions::new(resolve_model(model_id)?)
                .with_show_download_progress(true),
        )
        .map_err(|e| Error::Embedding(e.to_string()))?;
        tracing::info!(model = model_id, "loaded embedding model");

        Ok(Self {
            model: Mutex::new(model),
            model_id: model_id.to_string(),
        })
    }

    /// Get the model ID.
    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_model() {
        assert!(matches!(
            resolve_model(DEFAULT_MODEL),
            Ok(fastembed::EmbeddingModel::AllMiniLML6V2)
        ));
        assert!(matches!(
            resolve_model("bge-small-en-v1.5"),
            Ok(fastembed::EmbeddingModel::BGESmallENV15)
        ));
        assert!(matches!(resolve_model("gpt-2"), Err(Error::Config(_))));
    }

    #[test]
    #[ignore = "downloads the model from Hugging Face"]
    fn test_initialization() {
        let generator = EmbeddingGenerator::new().expect("Failed to create generator");
        let embedding = generator.embed_query("Hello world").expect("Failed to embed text");
        assert_eq!(embedding.len(), 384); // all-MiniLM-L6-v2 dimensions
        assert_eq!(
            litevss_core::probe_dimensionality(&generator).unwrap(),
            384
        );
    }
}
