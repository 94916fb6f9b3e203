//! Storage trait definitions.

use crate::document::{Document, Metadata};
use crate::storage::SqliteVss;
use crate::Result;
use async_trait::async_trait;

/// Vector storage and similarity search trait.
///
/// This is the surface a retrieval framework programs against. Results are
/// ordered nearest first; scores grow with distance.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Embed and store texts, returning their row ids.
    async fn add_texts(
        &self,
        texts: &[String],
        metadatas: Option<&[Metadata]>,
    ) -> Result<Vec<i64>>;

    /// Find documents similar to a text query.
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>>;

    /// Find documents similar to a text query, with scores.
    async fn similarity_search_with_score(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<(Document, f32)>>;

    /// Find documents similar to an embedding.
    async fn similarity_search_by_vector(
        &self,
        embedding: &[f32],
        k: usize,
    ) -> Result<Vec<Document>>;

    /// Find documents similar to an embedding, with scores.
    async fn similarity_search_with_score_by_vector(
        &self,
        embedding: &[f32],
        k: usize,
    ) -> Result<Vec<(Document, f32)>>;
}

#[async_trait]
impl VectorStore for SqliteVss {
    async fn add_texts(
        &self,
        texts: &[String],
        metadatas: Option<&[Metadata]>,
    ) -> Result<Vec<i64>> {
        SqliteVss::add_texts(self, texts, metadatas)
    }

    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>> {
        SqliteVss::similarity_search(self, query, k)
    }

    async fn similarity_search_with_score(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<(Document, f32)>> {
        SqliteVss::similarity_search_with_score(self, query, k)
    }

    async fn similarity_search_by_vector(
        &self,
        embedding: &[f32],
        k: usize,
    ) -> Result<Vec<Document>> {
        SqliteVss::similarity_search_by_vector(self, embedding, k)
    }

    async fn similarity_search_with_score_by_vector(
        &self,
        embedding: &[f32],
        k: usize,
    ) -> Result<Vec<(Document, f32)>> {
        SqliteVss::similarity_search_with_score_by_vector(self, embedding, k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::{page_metadatas, test_store};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_vector_store_trait_object() {
        let store: Arc<dyn VectorStore> = Arc::new(test_store("test"));
        let texts = vec!["foo".to_string(), "bar".to_string()];
        let ids = store
            .add_texts(&texts, Some(&page_metadatas(2)))
            .await
            .unwrap();
        assert_eq!(ids.len(), 2);

        let docs = store.similarity_search("bar", 1).await.unwrap();
        assert_eq!(docs[0].page_content, "bar");

        let scored = store.similarity_search_with_score("foo", 2).await.unwrap();
        assert_eq!(scored[0].0.page_content, "foo");
        assert!(scored[0].1 < scored[1].1);
    }
}
