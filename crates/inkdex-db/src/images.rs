//! Attribute-filtered image search against the metadata store.
//!
//! Each filter maps to a store-side SQL function (the optimized tier) plus a
//! direct table scan (the fallback tier). Deployments that predate the
//! search functions degrade to the scan with a logged warning instead of
//! failing the request; see [`is_unavailability_fault`].

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use inkdex_core::{AttributeFilter, Error, ImageRow, ImageStore, Result};

use crate::escape_like;

/// True for store faults that mean "this query mechanism does not exist
/// here": missing function, table, or column, or an unsupported feature.
/// Only these trigger the fallback tier; parameter and logic errors
/// propagate unchanged.
pub fn is_unavailability_fault(err: &sqlx::Error) -> bool {
    let sqlx::Error::Database(db_err) = err else {
        return false;
    };
    matches!(
        db_err.code().as_deref(),
        Some("42883") | Some("42P01") | Some("42703") | Some("0A000")
    )
}

/// PostgreSQL implementation of [`ImageStore`].
pub struct PgImageStore {
    pool: PgPool,
}

impl PgImageStore {
    /// Create a new PgImageStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn primary_search(
        &self,
        filter: &AttributeFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ImageRow>> {
        let rows = match filter {
            AttributeFilter::Keyword { term } => {
                sqlx::query(
                    "SELECT id, path, embedding_type, attributes
                     FROM image_search_keyword($1, $2, $3)",
                )
                .bind(term)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            AttributeFilter::BodyPart { part } => {
                sqlx::query(
                    "SELECT id, path, embedding_type, attributes
                     FROM image_search_body_part($1, $2, $3)",
                )
                .bind(part.to_lowercase())
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            AttributeFilter::PathFragment { fragment } => {
                sqlx::query(
                    "SELECT id, path, embedding_type, attributes
                     FROM image_search_path($1, $2, $3)",
                )
                .bind(fragment)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            AttributeFilter::NoTattoo => {
                sqlx::query(
                    "SELECT id, path, embedding_type, attributes
                     FROM image_search_no_tattoo($1, $2)",
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(Error::Database)?;

        rows.iter().map(map_image_row).collect()
    }

    async fn fallback_search(
        &self,
        filter: &AttributeFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ImageRow>> {
        let rows = match filter {
            AttributeFilter::Keyword { term } => {
                // Broad scan over the attribute document text. Slower than
                // the analyzed FTS function but needs nothing beyond the
                // base table.
                sqlx::query(
                    r#"
                    SELECT id, path, embedding_type, attributes
                    FROM image_embedding
                    WHERE attributes::text ILIKE '%' || $1 || '%' ESCAPE '\'
                    ORDER BY path, embedding_type
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(escape_like(term))
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            AttributeFilter::BodyPart { part } => {
                sqlx::query(
                    r#"
                    SELECT id, path, embedding_type, attributes
                    FROM image_embedding
                    WHERE LOWER(attributes->>'bodyPart') = LOWER($1)
                    ORDER BY path, embedding_type
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(part)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            AttributeFilter::PathFragment { fragment } => {
                // The store holds one row per embedding, so a path can match
                // more than once; DISTINCT ON collapses to one row per path
                // (preferring 'full' over 'partial') before paginating.
                sqlx::query(
                    r#"
                    SELECT id, path, embedding_type, attributes FROM (
                        SELECT DISTINCT ON (path) id, path, embedding_type, attributes
                        FROM image_embedding
                        WHERE path ILIKE '%' || $1 || '%' ESCAPE '\'
                        ORDER BY path, embedding_type
                    ) AS unique_paths
                    ORDER BY path
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(escape_like(fragment))
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            AttributeFilter::NoTattoo => {
                sqlx::query(
                    r#"
                    SELECT id, path, embedding_type, attributes
                    FROM image_embedding
                    WHERE (attributes->>'isLikelyTattoo')::boolean IS FALSE
                    ORDER BY path, embedding_type
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(Error::Database)?;

        rows.iter().map(map_image_row).collect()
    }

    async fn primary_count(&self, filter: &AttributeFilter) -> Result<i64> {
        let row = match filter {
            AttributeFilter::Keyword { term } => {
                sqlx::query("SELECT image_count_keyword($1) AS count")
                    .bind(term)
                    .fetch_one(&self.pool)
                    .await
            }
            AttributeFilter::BodyPart { part } => {
                sqlx::query("SELECT image_count_body_part($1) AS count")
                    .bind(part.to_lowercase())
                    .fetch_one(&self.pool)
                    .await
            }
            AttributeFilter::PathFragment { fragment } => {
                sqlx::query("SELECT image_count_path($1) AS count")
                    .bind(fragment)
                    .fetch_one(&self.pool)
                    .await
            }
            AttributeFilter::NoTattoo => {
                sqlx::query("SELECT image_count_no_tattoo() AS count")
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(Error::Database)?;

        Ok(row.get("count"))
    }

    async fn fallback_count(&self, filter: &AttributeFilter) -> Result<i64> {
        let row = match filter {
            AttributeFilter::Keyword { term } => {
                sqlx::query(
                    r#"
                    SELECT COUNT(*) AS count
                    FROM image_embedding
                    WHERE attributes::text ILIKE '%' || $1 || '%' ESCAPE '\'
                    "#,
                )
                .bind(escape_like(term))
                .fetch_one(&self.pool)
                .await
            }
            AttributeFilter::BodyPart { part } => {
                sqlx::query(
                    "SELECT COUNT(*) AS count
                     FROM image_embedding
                     WHERE LOWER(attributes->>'bodyPart') = LOWER($1)",
                )
                .bind(part)
                .fetch_one(&self.pool)
                .await
            }
            AttributeFilter::PathFragment { fragment } => {
                // Path pages are deduplicated, so the count is path-distinct
                // to keep total_count consistent with what pagination can
                // actually enumerate.
                sqlx::query(
                    r#"
                    SELECT COUNT(DISTINCT path) AS count
                    FROM image_embedding
                    WHERE path ILIKE '%' || $1 || '%' ESCAPE '\'
                    "#,
                )
                .bind(escape_like(fragment))
                .fetch_one(&self.pool)
                .await
            }
            AttributeFilter::NoTattoo => {
                sqlx::query(
                    "SELECT COUNT(*) AS count
                     FROM image_embedding
                     WHERE (attributes->>'isLikelyTattoo')::boolean IS FALSE",
                )
                .fetch_one(&self.pool)
                .await
            }
        }
        .map_err(Error::Database)?;

        Ok(row.get("count"))
    }
}

#[async_trait]
impl ImageStore for PgImageStore {
    async fn search(
        &self,
        filter: &AttributeFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ImageRow>> {
        match self.primary_search(filter, limit, offset).await {
            Ok(rows) => Ok(rows),
            Err(Error::Database(e)) if is_unavailability_fault(&e) => {
                tracing::warn!(
                    subsystem = "db",
                    component = "image_store",
                    op = "search",
                    fallback = true,
                    sqlstate = sqlstate_of(&e),
                    filter = %filter,
                    "Primary search query unavailable, using fallback scan"
                );
                self.fallback_search(filter, limit, offset).await
            }
            Err(e) => Err(e),
        }
    }

    async fn count(&self, filter: &AttributeFilter) -> Result<i64> {
        match self.primary_count(filter).await {
            Ok(count) => Ok(count),
            Err(Error::Database(e)) if is_unavailability_fault(&e) => {
                tracing::warn!(
                    subsystem = "db",
                    component = "image_store",
                    op = "count",
                    fallback = true,
                    sqlstate = sqlstate_of(&e),
                    filter = %filter,
                    "Primary count query unavailable, using fallback scan"
                );
                self.fallback_count(filter).await
            }
            Err(e) => Err(e),
        }
    }
}

fn sqlstate_of(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db_err) => db_err
            .code()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        _ => "unknown".to_string(),
    }
}

fn map_image_row(row: &PgRow) -> Result<ImageRow> {
    let id: Option<Uuid> = row.try_get("id").map_err(Error::Database)?;
    let path: String = row.try_get("path").map_err(Error::Database)?;
    let kind: Option<String> = row.try_get("embedding_type").map_err(Error::Database)?;
    let attributes_raw: Option<JsonValue> = row.try_get("attributes").map_err(Error::Database)?;

    let attributes = attributes_raw
        .map(serde_json::from_value)
        .transpose()?
        .unwrap_or_default();

    Ok(ImageRow {
        id: id.map(|u| u.to_string()),
        path,
        attributes,
        similarity: None,
        embedding_kind: kind.and_then(|k| k.parse().ok()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailability_fault_ignores_non_database_errors() {
        assert!(!is_unavailability_fault(&sqlx::Error::RowNotFound));
        assert!(!is_unavailability_fault(&sqlx::Error::PoolTimedOut));
    }
}
