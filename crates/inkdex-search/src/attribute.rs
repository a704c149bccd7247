//! Attribute strategy: one store round-trip per page plus a count query.
//!
//! Store-level faults are recovered here per the degradation contract: the
//! store already retried its fallback tier, so a fault at this level means
//! both tiers failed. The strategy then serves an empty page and logs the
//! fault instead of failing the whole request.

use std::sync::Arc;

use tracing::error;

use inkdex_core::{AttributeFilter, Error, ImageRow, ImageStore, Result, SearchIntent};

/// Map an attribute intent to its store filter. Similarity intents have no
/// attribute filter and return `None`.
pub fn filter_for(intent: &SearchIntent) -> Option<AttributeFilter> {
    match intent {
        SearchIntent::Keyword { term, .. } => Some(AttributeFilter::Keyword { term: term.clone() }),
        SearchIntent::BodyPart { part, .. } => Some(AttributeFilter::BodyPart {
            part: part.to_lowercase(),
        }),
        SearchIntent::Path { fragment, .. } => Some(AttributeFilter::PathFragment {
            fragment: fragment.clone(),
        }),
        SearchIntent::Exclusion { .. } => Some(AttributeFilter::NoTattoo),
        SearchIntent::Similarity { .. } => None,
    }
}

/// Executes attribute-filtered searches with graceful degradation.
pub struct AttributeStrategy {
    store: Arc<dyn ImageStore>,
}

impl AttributeStrategy {
    pub fn new(store: Arc<dyn ImageStore>) -> Self {
        Self { store }
    }

    /// Fetch one page of raw rows and the authoritative total count.
    ///
    /// A store fault (both query tiers down) yields `(vec![], 0)`; parameter
    /// errors propagate.
    pub async fn execute(
        &self,
        filter: &AttributeFilter,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<ImageRow>, i64)> {
        let offset = page * page_size;

        let rows = match self.store.search(filter, page_size, offset).await {
            Ok(rows) => rows,
            Err(e @ (Error::Database(_) | Error::Search(_))) => {
                error!(
                    subsystem = "search",
                    component = "attribute_strategy",
                    op = "search",
                    filter = %filter,
                    error = %e,
                    "Store search failed on both tiers, serving empty page"
                );
                return Ok((Vec::new(), 0));
            }
            Err(e) => return Err(e),
        };

        let total_count = match self.store.count(filter).await {
            Ok(count) => count,
            Err(e @ (Error::Database(_) | Error::Search(_))) => {
                // The page itself succeeded; a dead count query degrades to
                // counting what we can see.
                error!(
                    subsystem = "search",
                    component = "attribute_strategy",
                    op = "count",
                    filter = %filter,
                    error = %e,
                    "Store count failed on both tiers, using page length"
                );
                offset + rows.len() as i64
            }
            Err(e) => return Err(e),
        };

        Ok((rows, total_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_for_attribute_intents() {
        let keyword = SearchIntent::Keyword {
            term: "rose".into(),
            limit: 12,
        };
        assert_eq!(
            filter_for(&keyword),
            Some(AttributeFilter::Keyword {
                term: "rose".into()
            })
        );

        let body_part = SearchIntent::BodyPart {
            part: "Arm".into(),
            limit: 12,
        };
        assert_eq!(
            filter_for(&body_part),
            Some(AttributeFilter::BodyPart { part: "arm".into() })
        );

        let exclusion = SearchIntent::Exclusion { limit: 12 };
        assert_eq!(filter_for(&exclusion), Some(AttributeFilter::NoTattoo));
    }

    #[test]
    fn test_filter_for_similarity_is_none() {
        let intent = SearchIntent::Similarity {
            reference_path: Some("minio:photos/a.jpg".into()),
            image_data: None,
            limit: 12,
        };
        assert_eq!(filter_for(&intent), None);
    }
}
