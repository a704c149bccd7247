//! Search orchestration: intent dispatch, normalization, pagination, and the
//! chat entry point.
//!
//! The orchestrator holds no per-request state and no locks; every call is
//! independently invocable and concurrent searches never interfere. Callers
//! own the pagination state and resupply the full intent on every page.

use std::sync::Arc;
use std::time::Instant;

use sqlx::PgPool;
use tracing::{info, instrument};

use inkdex_core::{
    defaults, ChatSearchOutcome, EmbeddingStore, Error, ImageEmbedder, ImageStore, NoOpProgress,
    ProgressSink, Result, SearchIntent, SearchPage,
};
use inkdex_db::{PgEmbeddingStore, PgImageStore};
use inkdex_inference::VisionEmbedClient;

use crate::attribute::{filter_for, AttributeStrategy};
use crate::interpreter::QueryInterpreter;
use crate::normalize::normalize;
use crate::respond::{render, render_clarification};
use crate::similarity::SimilarityStrategy;

/// Orchestrator tunables.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Minimum cosine similarity for nearest-neighbor candidates.
    pub similarity_threshold: f32,
    /// Result limit for chat-initiated searches.
    pub chat_limit: i64,
    /// Default page size for browse UIs.
    pub browse_page_size: i64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: defaults::SIMILARITY_THRESHOLD,
            chat_limit: defaults::CHAT_LIMIT,
            browse_page_size: defaults::BROWSE_PAGE_SIZE,
        }
    }
}

/// Dispatches one search intent to exactly one retrieval strategy and routes
/// the raw rows through the result normalizer.
pub struct SearchOrchestrator {
    attribute: AttributeStrategy,
    similarity: SimilarityStrategy,
    interpreter: QueryInterpreter,
    progress: Arc<dyn ProgressSink>,
    config: SearchConfig,
}

impl SearchOrchestrator {
    /// Build an orchestrator over the given collaborators with defaults.
    pub fn new(
        store: Arc<dyn ImageStore>,
        embeddings: Arc<dyn EmbeddingStore>,
        embedder: Arc<dyn ImageEmbedder>,
    ) -> Self {
        let config = SearchConfig::default();
        Self {
            attribute: AttributeStrategy::new(store),
            similarity: SimilarityStrategy::new(embeddings, embedder)
                .with_threshold(config.similarity_threshold),
            interpreter: QueryInterpreter::new(),
            progress: Arc::new(NoOpProgress),
            config,
        }
    }

    /// Wire the Postgres store layer and the env-configured embedding client.
    pub fn from_pool(pool: PgPool) -> Self {
        Self::new(
            Arc::new(PgImageStore::new(pool.clone())),
            Arc::new(PgEmbeddingStore::new(pool)),
            Arc::new(VisionEmbedClient::from_env()),
        )
    }

    /// Replace the configuration (also applies the similarity threshold and
    /// the chat default limit).
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.similarity = self.similarity.with_threshold(config.similarity_threshold);
        self.interpreter = self.interpreter.with_default_limit(config.chat_limit);
        self.config = config;
        self
    }

    /// Replace the query interpreter (e.g. for a custom vocabulary).
    pub fn with_interpreter(mut self, interpreter: QueryInterpreter) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Attach a progress sink for the embed→search pipeline.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Execute one intent and return a normalized, deduplicated page.
    ///
    /// Attribute intents paginate through the store; similarity intents are
    /// single-page (nearest-neighbor retrieval has no offset), with
    /// `page_size` acting as the neighbor limit.
    #[instrument(
        skip(self, intent),
        fields(subsystem = "search", component = "orchestrator", op = "search", strategy = %intent.strategy())
    )]
    pub async fn search(
        &self,
        intent: &SearchIntent,
        page: i64,
        page_size: i64,
    ) -> Result<SearchPage> {
        if page < 0 {
            return Err(Error::InvalidInput(format!(
                "page must be non-negative, got {}",
                page
            )));
        }
        if page_size <= 0 {
            return Err(Error::InvalidInput(format!(
                "page_size must be positive, got {}",
                page_size
            )));
        }

        let start = Instant::now();

        let page_result = match intent {
            SearchIntent::Similarity {
                reference_path,
                image_data,
                ..
            } => {
                let rows = self
                    .similarity
                    .execute(
                        reference_path.as_deref(),
                        image_data.as_deref(),
                        page_size,
                        self.progress.as_ref(),
                    )
                    .await?;
                let records = normalize(rows);
                let total_count = records.len() as i64;
                SearchPage {
                    records,
                    total_count,
                    page,
                    page_size,
                }
            }
            _ => {
                let filter = filter_for(intent)
                    .expect("attribute intents always map to a filter");
                let (rows, total_count) = self.attribute.execute(&filter, page, page_size).await?;
                SearchPage {
                    records: normalize(rows),
                    total_count,
                    page,
                    page_size,
                }
            }
        };

        info!(
            result_count = page_result.records.len(),
            total_count = page_result.total_count,
            page,
            page_size,
            duration_ms = start.elapsed().as_millis() as u64,
            "Search complete"
        );

        Ok(page_result)
    }

    /// One page of a browse UI search with the configured page size.
    pub async fn browse(&self, intent: &SearchIntent, page: i64) -> Result<SearchPage> {
        self.search(intent, page, self.config.browse_page_size).await
    }

    /// Single entry point for the chat surface: interpret free text, execute
    /// the selected strategy, and render the response sentence.
    ///
    /// A similarity intent with no resolvable reference skips execution and
    /// returns a clarifying response, distinct from an empty result.
    /// Embedding faults (`MissingEmbedding`, `Embedding`) propagate typed;
    /// they are never rendered as "no results".
    pub async fn process_chat_request(&self, text: &str) -> Result<ChatSearchOutcome> {
        self.process_chat_request_with_attachment(text, None).await
    }

    /// Chat entry point with an optional attached image. The attachment
    /// supplies the reference for a similarity intent whose text names no
    /// path.
    pub async fn process_chat_request_with_attachment(
        &self,
        text: &str,
        attachment: Option<Vec<u8>>,
    ) -> Result<ChatSearchOutcome> {
        let mut intent = self.interpreter.interpret(text);

        if let SearchIntent::Similarity {
            reference_path: None,
            image_data,
            ..
        } = &mut intent
        {
            if image_data.is_none() {
                *image_data = attachment;
            }
        }

        if let SearchIntent::Similarity {
            reference_path: None,
            image_data: None,
            ..
        } = &intent
        {
            let response = render_clarification(&intent);
            return Ok(ChatSearchOutcome {
                intent,
                records: Vec::new(),
                response,
                total_count: 0,
                clarification: true,
            });
        }

        // The interpreter already clamped the limit into range.
        let page = self
            .search(&intent, defaults::PAGE_OFFSET, intent.limit())
            .await?;
        let response = render(&intent, page.records.len());

        Ok(ChatSearchOutcome {
            intent,
            records: page.records,
            response,
            total_count: page.total_count,
            clarification: false,
        })
    }
}
