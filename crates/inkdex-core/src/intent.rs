//! Typed search intents produced by the query interpreter.

use serde::{Deserialize, Serialize};

use crate::defaults;

/// The retrieval mechanism an intent dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Keyword,
    BodyPart,
    Path,
    Exclusion,
    Similarity,
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Keyword => "keyword",
            Self::BodyPart => "body_part",
            Self::Path => "path",
            Self::Exclusion => "exclusion",
            Self::Similarity => "similarity",
        };
        f.write_str(s)
    }
}

/// Structured representation of what a free-text query is asking for.
/// Exactly one variant is active per request; intents are constructed per
/// request and discarded after orchestration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchIntent {
    /// Free-text match against the analyzed-attributes document.
    Keyword { term: String, limit: i64 },
    /// Categorical match on the body-part attribute.
    BodyPart { part: String, limit: i64 },
    /// Substring match against the canonical storage path.
    Path { fragment: String, limit: i64 },
    /// Images with no tattoo present.
    Exclusion { limit: i64 },
    /// Nearest-neighbor search around a reference image. At most one of
    /// `reference_path`/`image_data` is set by the interpreter; the
    /// orchestrator requires exactly one.
    Similarity {
        #[serde(skip_serializing_if = "Option::is_none")]
        reference_path: Option<String>,
        /// Raw image bytes supplied out-of-band (e.g. a chat attachment).
        /// Not serialized; resupplied by the caller per request.
        #[serde(skip)]
        image_data: Option<Vec<u8>>,
        limit: i64,
    },
}

impl SearchIntent {
    /// The result limit carried by this intent.
    pub fn limit(&self) -> i64 {
        match self {
            Self::Keyword { limit, .. }
            | Self::BodyPart { limit, .. }
            | Self::Path { limit, .. }
            | Self::Exclusion { limit }
            | Self::Similarity { limit, .. } => *limit,
        }
    }

    /// Replace the carried limit.
    pub fn with_limit(mut self, new_limit: i64) -> Self {
        match &mut self {
            Self::Keyword { limit, .. }
            | Self::BodyPart { limit, .. }
            | Self::Path { limit, .. }
            | Self::Exclusion { limit }
            | Self::Similarity { limit, .. } => *limit = new_limit,
        }
        self
    }

    /// The retrieval strategy this intent dispatches to.
    pub fn strategy(&self) -> StrategyKind {
        match self {
            Self::Keyword { .. } => StrategyKind::Keyword,
            Self::BodyPart { .. } => StrategyKind::BodyPart,
            Self::Path { .. } => StrategyKind::Path,
            Self::Exclusion { .. } => StrategyKind::Exclusion,
            Self::Similarity { .. } => StrategyKind::Similarity,
        }
    }
}

impl std::fmt::Display for SearchIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keyword { term, limit } => write!(f, "keyword({:?}, limit={})", term, limit),
            Self::BodyPart { part, limit } => write!(f, "body_part({}, limit={})", part, limit),
            Self::Path { fragment, limit } => write!(f, "path({:?}, limit={})", fragment, limit),
            Self::Exclusion { limit } => write!(f, "exclusion(limit={})", limit),
            Self::Similarity {
                reference_path,
                image_data,
                limit,
            } => write!(
                f,
                "similarity(reference={:?}, raw_bytes={}, limit={})",
                reference_path,
                image_data.is_some(),
                limit
            ),
        }
    }
}

/// Clamp an extracted result limit into `[LIMIT_MIN, LIMIT_MAX]`.
///
/// Zero and negative values reset to `default` rather than clamping to the
/// minimum: "show 0 images" means the number was noise, not a request for
/// nothing.
pub fn clamp_limit(requested: i64, default: i64) -> i64 {
    if requested < defaults::LIMIT_MIN {
        default
    } else {
        requested.min(defaults::LIMIT_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_accessor_covers_all_variants() {
        let intents = vec![
            SearchIntent::Keyword {
                term: "rose".into(),
                limit: 5,
            },
            SearchIntent::BodyPart {
                part: "arm".into(),
                limit: 6,
            },
            SearchIntent::Path {
                fragment: "intake".into(),
                limit: 7,
            },
            SearchIntent::Exclusion { limit: 8 },
            SearchIntent::Similarity {
                reference_path: None,
                image_data: None,
                limit: 9,
            },
        ];
        let limits: Vec<i64> = intents.iter().map(|i| i.limit()).collect();
        assert_eq!(limits, vec![5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_with_limit_replaces_in_place() {
        let intent = SearchIntent::Exclusion { limit: 12 }.with_limit(30);
        assert_eq!(intent.limit(), 30);
    }

    #[test]
    fn test_strategy_mapping() {
        assert_eq!(
            SearchIntent::Keyword {
                term: "x".into(),
                limit: 1
            }
            .strategy(),
            StrategyKind::Keyword
        );
        assert_eq!(
            SearchIntent::Similarity {
                reference_path: Some("p".into()),
                image_data: None,
                limit: 1
            }
            .strategy(),
            StrategyKind::Similarity
        );
    }

    #[test]
    fn test_clamp_limit_bounds() {
        assert_eq!(clamp_limit(500, 12), 50);
        assert_eq!(clamp_limit(50, 12), 50);
        assert_eq!(clamp_limit(1, 12), 1);
        assert_eq!(clamp_limit(0, 12), 12);
        assert_eq!(clamp_limit(-3, 20), 20);
    }

    #[test]
    fn test_intent_serialization_tags() {
        let intent = SearchIntent::BodyPart {
            part: "arm".into(),
            limit: 12,
        };
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["type"], "body_part");
        assert_eq!(json["part"], "arm");
        assert_eq!(json["limit"], 12);
    }

    #[test]
    fn test_similarity_image_data_not_serialized() {
        let intent = SearchIntent::Similarity {
            reference_path: None,
            image_data: Some(vec![1, 2, 3]),
            limit: 12,
        };
        let json = serde_json::to_string(&intent).unwrap();
        assert!(!json.contains("image_data"));

        let back: SearchIntent = serde_json::from_str(&json).unwrap();
        match back {
            SearchIntent::Similarity { image_data, .. } => assert!(image_data.is_none()),
            _ => panic!("Expected Similarity intent"),
        }
    }
}
