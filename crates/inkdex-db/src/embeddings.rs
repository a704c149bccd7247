//! Stored-embedding lookup and nearest-neighbor retrieval.

use async_trait::async_trait;
use pgvector::Vector;
use serde_json::Value as JsonValue;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use inkdex_core::{EmbeddingKind, EmbeddingStore, Error, ImageRow, Result};

/// PostgreSQL + pgvector implementation of [`EmbeddingStore`].
pub struct PgEmbeddingStore {
    pool: PgPool,
}

impl PgEmbeddingStore {
    /// Create a new PgEmbeddingStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Count stored embedding rows (all kinds).
    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM image_embedding")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.get("count"))
    }
}

#[async_trait]
impl EmbeddingStore for PgEmbeddingStore {
    async fn get_embedding(&self, path: &str, kind: EmbeddingKind) -> Result<Option<Vector>> {
        let row = sqlx::query(
            "SELECT vector
             FROM image_embedding
             WHERE path = $1 AND embedding_type = $2
             LIMIT 1",
        )
        .bind(path)
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|r| r.get("vector")))
    }

    async fn nearest_neighbors(
        &self,
        vector: &Vector,
        threshold: f32,
        limit: i64,
    ) -> Result<Vec<ImageRow>> {
        // Cosine similarity via pgvector's <=> distance operator. Rows below
        // the threshold are dropped store-side; ordering is best-first.
        let rows = sqlx::query(
            r#"
            SELECT id, path, embedding_type, attributes,
                   1.0 - (vector <=> $1::vector) AS similarity
            FROM image_embedding
            WHERE 1.0 - (vector <=> $1::vector) >= $2
            ORDER BY vector <=> $1::vector
            LIMIT $3
            "#,
        )
        .bind(vector)
        .bind(threshold as f64)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.iter()
            .map(|row| {
                let id: Option<Uuid> = row.try_get("id").map_err(Error::Database)?;
                let path: String = row.try_get("path").map_err(Error::Database)?;
                let kind: Option<String> =
                    row.try_get("embedding_type").map_err(Error::Database)?;
                let attributes_raw: Option<JsonValue> =
                    row.try_get("attributes").map_err(Error::Database)?;
                let similarity: f64 = row.try_get("similarity").map_err(Error::Database)?;

                let attributes = attributes_raw
                    .map(serde_json::from_value)
                    .transpose()?
                    .unwrap_or_default();

                Ok(ImageRow {
                    id: id.map(|u| u.to_string()),
                    path,
                    attributes,
                    similarity: Some(similarity as f32),
                    embedding_kind: kind.and_then(|k| k.parse().ok()),
                })
            })
            .collect()
    }
}
