//! Core data models for inkdex.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

use crate::intent::SearchIntent;

// Re-export the pgvector type so downstream crates share one Vector.
pub use pgvector::Vector;

/// Provenance of an embedding row: whole-image vector or detail-crop vector.
///
/// A single image may have both a `Full` and a `Partial` row in the store,
/// which is why result sets are deduplicated by path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingKind {
    Full,
    Partial,
}

impl EmbeddingKind {
    /// Store-level string value for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Partial => "partial",
        }
    }
}

impl std::fmt::Display for EmbeddingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EmbeddingKind {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "partial" => Ok(Self::Partial),
            _ => Err(format!("Invalid embedding kind: {}", s)),
        }
    }
}

/// Attribute document attached to an image record.
///
/// Known keys are typed for safe matching in strategies; everything else the
/// ingestion pipeline wrote is carried through untouched in `extra`. The map
/// is passthrough data and is never validated here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_part: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_likely_tattoo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fading_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    /// Unrecognized keys, preserved verbatim.
    #[serde(flatten, default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, JsonValue>,
}

/// Raw image row as returned by a store query, before normalization.
///
/// `id` may be absent (some store queries only project the embedding row),
/// and several rows may share one `path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub path: String,
    #[serde(default)]
    pub attributes: ImageAttributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_kind: Option<EmbeddingKind>,
}

impl ImageRow {
    /// Convenience constructor for a bare row with just a path.
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            id: None,
            path: path.into(),
            attributes: ImageAttributes::default(),
            similarity: None,
            embedding_kind: None,
        }
    }
}

/// Canonical image record, post-normalization. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Stable identifier; synthesized from the path when the row had none.
    pub id: String,
    /// Canonical provider-prefixed storage path. Dedup key.
    pub path: String,
    /// Last `/`-delimited segment of `path`.
    pub filename: String,
    #[serde(default)]
    pub attributes: ImageAttributes,
    /// Cosine similarity in `[0, 1]`; similarity-strategy results only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_kind: Option<EmbeddingKind>,
}

impl From<ImageRecord> for ImageRow {
    fn from(record: ImageRecord) -> Self {
        Self {
            id: Some(record.id),
            path: record.path,
            attributes: record.attributes,
            similarity: record.similarity,
            embedding_kind: record.embedding_kind,
        }
    }
}

/// Derive a stable record id from a canonical path.
///
/// UUIDv5 over the URL namespace, so the same path always maps to the same
/// id regardless of which query produced the row.
pub fn synthesize_id(path: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, path.as_bytes()).to_string()
}

/// One page of search results plus pagination state.
///
/// `total_count` is authoritative from the store's count query. For the
/// keyword, body-part, and exclusion strategies it counts raw embedding rows
/// and may overstate the unique-path count when an image has both full and
/// partial rows; the path strategy counts distinct paths. Callers own the
/// pagination state and resupply the intent on every page request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage {
    pub records: Vec<ImageRecord>,
    pub total_count: i64,
    pub page: i64,
    pub page_size: i64,
}

impl SearchPage {
    /// Empty page with the given pagination state.
    pub fn empty(page: i64, page_size: i64) -> Self {
        Self {
            records: Vec::new(),
            total_count: 0,
            page,
            page_size,
        }
    }

    /// Number of pages needed to enumerate `total_count` rows.
    pub fn page_count(&self) -> i64 {
        if self.page_size <= 0 {
            return 0;
        }
        (self.total_count + self.page_size - 1) / self.page_size
    }
}

/// Outcome of a chat-initiated search request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSearchOutcome {
    /// The interpreted search parameters, echoed back to the chat surface.
    pub intent: SearchIntent,
    pub records: Vec<ImageRecord>,
    /// Natural-language summary of the outcome.
    pub response: String,
    pub total_count: i64,
    /// True when the request needed clarification instead of execution
    /// (similarity intent with no resolvable reference image).
    pub clarification: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_kind_roundtrip() {
        assert_eq!(EmbeddingKind::Full.to_string(), "full");
        assert_eq!(EmbeddingKind::Partial.to_string(), "partial");
        assert_eq!("full".parse::<EmbeddingKind>().unwrap(), EmbeddingKind::Full);
        assert_eq!(
            "PARTIAL".parse::<EmbeddingKind>().unwrap(),
            EmbeddingKind::Partial
        );
        assert!("half".parse::<EmbeddingKind>().is_err());
    }

    #[test]
    fn test_attributes_camel_case_and_passthrough() {
        let json = r#"{
            "bodyPart": "arm",
            "isLikelyTattoo": true,
            "fadingPercentage": 12.5,
            "colors": ["black", "red"],
            "studio": "north-side"
        }"#;

        let attrs: ImageAttributes = serde_json::from_str(json).unwrap();
        assert_eq!(attrs.body_part.as_deref(), Some("arm"));
        assert_eq!(attrs.is_likely_tattoo, Some(true));
        assert_eq!(attrs.fading_percentage, Some(12.5));
        assert_eq!(attrs.colors.as_ref().unwrap().len(), 2);
        assert_eq!(attrs.extra["studio"], "north-side");

        let back = serde_json::to_value(&attrs).unwrap();
        assert_eq!(back["bodyPart"], "arm");
        assert_eq!(back["studio"], "north-side");
    }

    #[test]
    fn test_attributes_empty_document() {
        let attrs: ImageAttributes = serde_json::from_str("{}").unwrap();
        assert_eq!(attrs, ImageAttributes::default());
    }

    #[test]
    fn test_synthesize_id_is_stable() {
        let a = synthesize_id("minio:photos/a.jpg");
        let b = synthesize_id("minio:photos/a.jpg");
        let c = synthesize_id("minio:photos/b.jpg");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_search_page_page_count() {
        let mut page = SearchPage::empty(0, 20);
        page.total_count = 45;
        assert_eq!(page.page_count(), 3);

        page.total_count = 40;
        assert_eq!(page.page_count(), 2);

        page.total_count = 0;
        assert_eq!(page.page_count(), 0);
    }

    #[test]
    fn test_image_row_from_path() {
        let row = ImageRow::from_path("minio:intake/new.png");
        assert_eq!(row.path, "minio:intake/new.png");
        assert!(row.id.is_none());
        assert!(row.similarity.is_none());
    }
}
