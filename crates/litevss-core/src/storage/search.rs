//! k-NN query path.

use crate::document::{metadata_from_json, Document};
use crate::embedding::vector_to_json;
use crate::error::{Error, Result};
use crate::storage::sqlite::SqliteVss;
use rusqlite::params;

/// Largest `k` a single `vec0` k-NN query accepts.
pub const MAX_KNN_K: usize = 4096;

/// Convert a raw L2 distance into the score reported with search results.
///
/// The score grows with the distance (0.0 for an exact match), so ascending
/// scores rank the same way as ascending distances. For unit-length vectors it
/// falls in `[0, √2]`.
pub fn euclidean_score(distance: f64) -> f32 {
    (distance / std::f64::consts::SQRT_2) as f32
}

impl SqliteVss {
    /// Return the `k` documents closest to `query`, nearest first, with scores.
    ///
    /// A single query returns at most [`MAX_KNN_K`] hits.
    pub fn similarity_search_with_score_by_vector(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<(Document, f32)>> {
        if k == 0 {
            return Err(Error::InvalidInput("k must be greater than 0".to_string()));
        }
        self.check_dimensionality(query)?;
        // vec0 rejects larger k; clamping keeps "at most k hits"
        let knn_k = i64::try_from(k.min(MAX_KNN_K))
            .map_err(|_| Error::InvalidInput(format!("k out of range: {k}")))?;
        let query_json = vector_to_json(query)?;
        let vector_table = self.table.vector_table();

        let conn = self.lock()?;

        // vec0 refuses a MATCH against an empty index
        let has_vectors: bool = conn
            .query_row(
                &format!("SELECT EXISTS(SELECT 1 FROM {vector_table})"),
                [],
                |row| row.get(0),
            )
            .map_err(Error::StorageRead)?;
        if !has_vectors {
            return Ok(Vec::new());
        }

        let mut stmt = conn
            .prepare(&format!(
                r#"
                WITH knn AS (
                    SELECT rowid, distance
                    FROM {vector_table}
                    WHERE text_embedding MATCH ?1
                      AND k = ?2
                )
                SELECT e.text, e.metadata, knn.distance
                FROM knn
                JOIN {table} e ON e.rowid = knn.rowid
                ORDER BY knn.distance
                "#,
                table = self.table,
            ))
            .map_err(Error::StorageRead)?;

        let rows = stmt
            .query_map(params![query_json, knn_k], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, f64>(2)?,
                ))
            })
            .map_err(Error::StorageRead)?;

        let mut results = Vec::new();
        for row in rows {
            let (text, metadata, distance) = row.map_err(Error::StorageRead)?;
            let document = Document {
                page_content: text,
                metadata: metadata_from_json(metadata.as_deref())?,
            };
            results.push((document, euclidean_score(distance)));
        }

        tracing::debug!(table = %self.table, k, hits = results.len(), "similarity search");
        Ok(results)
    }

    /// Like [`Self::similarity_search_with_score_by_vector`] without the scores.
    pub fn similarity_search_by_vector(&self, query: &[f32], k: usize) -> Result<Vec<Document>> {
        Ok(strip_scores(
            self.similarity_search_with_score_by_vector(query, k)?,
        ))
    }

    /// Embed `query` and return the closest documents with scores.
    pub fn similarity_search_with_score(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<(Document, f32)>> {
        let embedding = self.embedder.embed_query(query)?;
        self.similarity_search_with_score_by_vector(&embedding, k)
    }

    /// Embed `query` and return the closest documents.
    pub fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>> {
        Ok(strip_scores(self.similarity_search_with_score(query, k)?))
    }
}

fn strip_scores(results: Vec<(Document, f32)>) -> Vec<Document> {
    results.into_iter().map(|(doc, _)| doc).collect()
}
