//! In-memory collaborator fakes for orchestrator tests.

use std::collections::HashSet;

use async_trait::async_trait;

use inkdex_core::{
    AttributeFilter, EmbeddingKind, EmbeddingStore, Error, ImageAttributes, ImageRow, ImageStore,
    Result, Vector,
};

/// Image metadata store backed by a plain vector of rows.
pub struct InMemoryImageStore {
    rows: Vec<ImageRow>,
    fail: bool,
}

impl InMemoryImageStore {
    pub fn new(rows: Vec<ImageRow>) -> Self {
        Self { rows, fail: false }
    }

    /// A store whose every query fails, as if both query tiers were down.
    pub fn offline() -> Self {
        Self {
            rows: Vec::new(),
            fail: true,
        }
    }

    fn matching(&self, filter: &AttributeFilter) -> Vec<ImageRow> {
        let matched: Vec<ImageRow> = self
            .rows
            .iter()
            .filter(|row| match filter {
                AttributeFilter::Keyword { term } => {
                    let doc = serde_json::to_string(&row.attributes)
                        .unwrap_or_default()
                        .to_lowercase();
                    doc.contains(&term.to_lowercase())
                }
                AttributeFilter::BodyPart { part } => row
                    .attributes
                    .body_part
                    .as_deref()
                    .map(|b| b.eq_ignore_ascii_case(part))
                    .unwrap_or(false),
                AttributeFilter::PathFragment { fragment } => {
                    row.path.to_lowercase().contains(&fragment.to_lowercase())
                }
                AttributeFilter::NoTattoo => row.attributes.is_likely_tattoo == Some(false),
            })
            .cloned()
            .collect();

        // The store's path query is path-distinct; other filters return one
        // row per embedding.
        if matches!(filter, AttributeFilter::PathFragment { .. }) {
            let mut seen = HashSet::new();
            matched
                .into_iter()
                .filter(|row| seen.insert(row.path.clone()))
                .collect()
        } else {
            matched
        }
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn search(
        &self,
        filter: &AttributeFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ImageRow>> {
        if self.fail {
            return Err(Error::Search("store offline".to_string()));
        }
        Ok(self
            .matching(filter)
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count(&self, filter: &AttributeFilter) -> Result<i64> {
        if self.fail {
            return Err(Error::Search("store offline".to_string()));
        }
        Ok(self.matching(filter).len() as i64)
    }
}

/// Embedding store backed by `(path, kind, vector)` triples.
pub struct InMemoryEmbeddingStore {
    embeddings: Vec<(String, EmbeddingKind, Vec<f32>)>,
}

impl InMemoryEmbeddingStore {
    pub fn new(embeddings: Vec<(String, EmbeddingKind, Vec<f32>)>) -> Self {
        Self { embeddings }
    }

    pub fn empty() -> Self {
        Self {
            embeddings: Vec::new(),
        }
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}

#[async_trait]
impl EmbeddingStore for InMemoryEmbeddingStore {
    async fn get_embedding(&self, path: &str, kind: EmbeddingKind) -> Result<Option<Vector>> {
        Ok(self
            .embeddings
            .iter()
            .find(|(p, k, _)| p == path && *k == kind)
            .map(|(_, _, v)| Vector::from(v.clone())))
    }

    async fn nearest_neighbors(
        &self,
        vector: &Vector,
        threshold: f32,
        limit: i64,
    ) -> Result<Vec<ImageRow>> {
        let query = vector.as_slice();
        let mut scored: Vec<(f32, ImageRow)> = self
            .embeddings
            .iter()
            .map(|(path, kind, stored)| {
                let similarity = cosine(query, stored);
                let mut row = ImageRow::from_path(path.clone());
                row.similarity = Some(similarity);
                row.embedding_kind = Some(*kind);
                (similarity, row)
            })
            .filter(|(similarity, _)| *similarity >= threshold)
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        Ok(scored
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|(_, row)| row)
            .collect())
    }
}

/// Row with a body-part attribute.
pub fn body_part_row(path: &str, part: &str) -> ImageRow {
    ImageRow {
        id: None,
        path: path.to_string(),
        attributes: ImageAttributes {
            body_part: Some(part.to_string()),
            is_likely_tattoo: Some(true),
            ..ImageAttributes::default()
        },
        similarity: None,
        embedding_kind: Some(EmbeddingKind::Full),
    }
}

/// Row whose attribute document mentions `keyword`.
pub fn keyword_row(path: &str, keyword: &str, kind: EmbeddingKind) -> ImageRow {
    let mut attributes = ImageAttributes {
        is_likely_tattoo: Some(true),
        ..ImageAttributes::default()
    };
    attributes.extra.insert(
        "subject".to_string(),
        serde_json::Value::String(keyword.to_string()),
    );
    ImageRow {
        id: None,
        path: path.to_string(),
        attributes,
        similarity: None,
        embedding_kind: Some(kind),
    }
}

/// Row with no tattoo present.
pub fn clean_row(path: &str) -> ImageRow {
    ImageRow {
        id: None,
        path: path.to_string(),
        attributes: ImageAttributes {
            is_likely_tattoo: Some(false),
            ..ImageAttributes::default()
        },
        similarity: None,
        embedding_kind: Some(EmbeddingKind::Full),
    }
}
