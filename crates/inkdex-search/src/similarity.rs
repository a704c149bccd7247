//! Similarity strategy: resolve a query vector, run nearest-neighbor
//! retrieval, and enforce the reference self-exclusion invariant.

use std::sync::Arc;

use tracing::debug;

use inkdex_core::{
    defaults, EmbeddingKind, EmbeddingStore, Error, ImageEmbedder, ImageRow, ProgressSink, Result,
    Vector,
};

/// Executes nearest-neighbor searches around a reference image.
pub struct SimilarityStrategy {
    embeddings: Arc<dyn EmbeddingStore>,
    embedder: Arc<dyn ImageEmbedder>,
    threshold: f32,
}

impl SimilarityStrategy {
    pub fn new(embeddings: Arc<dyn EmbeddingStore>, embedder: Arc<dyn ImageEmbedder>) -> Self {
        Self {
            embeddings,
            embedder,
            threshold: defaults::SIMILARITY_THRESHOLD,
        }
    }

    /// Override the similarity threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Resolve the query vector for this request.
    ///
    /// Raw bytes take the embedding service path; a reference path takes the
    /// stored-vector path. Both failure modes are fatal for the request:
    /// similarity search without a vector would misleadingly read as "no
    /// similar images exist".
    async fn resolve_query_vector(
        &self,
        reference_path: Option<&str>,
        image_data: Option<&[u8]>,
        progress: &dyn ProgressSink,
    ) -> Result<Vector> {
        progress.report(defaults::PROGRESS_RESOLVE, "resolving query vector");

        let vector = match (image_data, reference_path) {
            (Some(bytes), _) => self.embedder.embed_image(bytes).await?,
            (None, Some(path)) => self
                .embeddings
                .get_embedding(path, EmbeddingKind::Full)
                .await?
                .ok_or_else(|| Error::MissingEmbedding(path.to_string()))?,
            (None, None) => {
                return Err(Error::InsufficientQuery(
                    "similarity search needs a reference path or image bytes".to_string(),
                ))
            }
        };

        progress.report(defaults::PROGRESS_VECTOR_READY, "query vector ready");
        Ok(vector)
    }

    /// Run the two-stage embed→search pipeline.
    ///
    /// The returned rows never contain the reference path itself: a record
    /// is always maximally similar to itself, so the reference is excluded
    /// as a correctness invariant rather than an optimization.
    pub async fn execute(
        &self,
        reference_path: Option<&str>,
        image_data: Option<&[u8]>,
        limit: i64,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<ImageRow>> {
        let vector = self
            .resolve_query_vector(reference_path, image_data, progress)
            .await?;

        progress.report(defaults::PROGRESS_SEARCH, "nearest-neighbor search");

        // Over-fetch by one when a reference path is set: the reference row
        // itself may occupy a slot before exclusion.
        let fetch_limit = if reference_path.is_some() {
            limit + 1
        } else {
            limit
        };

        let mut rows = self
            .embeddings
            .nearest_neighbors(&vector, self.threshold, fetch_limit)
            .await?;

        progress.report(defaults::PROGRESS_SEARCH_DONE, "search complete");

        if let Some(reference) = reference_path {
            rows.retain(|row| row.path != reference);
        }
        rows.truncate(limit.max(0) as usize);

        debug!(
            subsystem = "search",
            component = "similarity_strategy",
            op = "execute",
            threshold = self.threshold,
            result_count = rows.len(),
            "Similarity search complete"
        );

        progress.report(defaults::PROGRESS_COMPLETE, "done");
        Ok(rows)
    }
}
