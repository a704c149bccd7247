//! Core traits for inkdex abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{EmbeddingKind, ImageRow, Vector};

// =============================================================================
// IMAGE STORE
// =============================================================================

/// Attribute-level filter executed by the metadata store.
///
/// One variant per attribute strategy; the store owns the mapping to its
/// query language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributeFilter {
    /// Case-insensitive free-text match against the analyzed-attributes
    /// document.
    Keyword { term: String },
    /// Equality on the bodyPart attribute, compared lower-cased.
    BodyPart { part: String },
    /// Case-insensitive substring match over the canonical path.
    PathFragment { fragment: String },
    /// Images whose isLikelyTattoo attribute is false.
    NoTattoo,
}

impl std::fmt::Display for AttributeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keyword { term } => write!(f, "keyword({:?})", term),
            Self::BodyPart { part } => write!(f, "body_part({})", part),
            Self::PathFragment { fragment } => write!(f, "path_fragment({:?})", fragment),
            Self::NoTattoo => write!(f, "no_tattoo"),
        }
    }
}

/// Attribute-filtered access to the image metadata store.
///
/// Implementations only read; concurrent searches never interfere.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Fetch one page of rows matching `filter`.
    async fn search(
        &self,
        filter: &AttributeFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ImageRow>>;

    /// Count rows matching `filter`, symmetric with `search`.
    async fn count(&self, filter: &AttributeFilter) -> Result<i64>;
}

// =============================================================================
// EMBEDDING STORE
// =============================================================================

/// Stored-vector lookup and nearest-neighbor retrieval.
#[async_trait]
pub trait EmbeddingStore: Send + Sync {
    /// Fetch the stored embedding for an exact path and kind, if any.
    async fn get_embedding(&self, path: &str, kind: EmbeddingKind) -> Result<Option<Vector>>;

    /// Nearest-neighbor retrieval around `vector`, filtered to similarity
    /// `>= threshold`, at most `limit` rows. Rows carry their similarity
    /// score and embedding kind.
    async fn nearest_neighbors(
        &self,
        vector: &Vector,
        threshold: f32,
        limit: i64,
    ) -> Result<Vec<ImageRow>>;
}

// =============================================================================
// EMBEDDING GENERATION
// =============================================================================

/// Backend that turns raw image bytes into a fixed-length vector.
#[async_trait]
pub trait ImageEmbedder: Send + Sync {
    /// Generate the embedding for one image.
    async fn embed_image(&self, image_data: &[u8]) -> Result<Vector>;

    /// Expected dimension of produced vectors.
    fn dimension(&self) -> usize;

    /// Model name in use.
    fn model_name(&self) -> &str;
}

// =============================================================================
// PROGRESS REPORTING
// =============================================================================

/// Advisory progress reporting for the two-stage embed→search pipeline.
///
/// Checkpoints are monotonically increasing percentages for UI feedback
/// only; they never affect control flow.
pub trait ProgressSink: Send + Sync {
    fn report(&self, percent: u8, stage: &str);
}

/// No-op sink for when progress feedback isn't needed.
pub struct NoOpProgress;

impl ProgressSink for NoOpProgress {
    fn report(&self, _percent: u8, _stage: &str) {}
}
