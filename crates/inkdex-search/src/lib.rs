//! # inkdex-search
//!
//! Query interpretation and search orchestration for inkdex.
//!
//! This crate provides:
//! - A heuristic gate deciding whether chat text is an image-search request
//! - A rule-based query interpreter over a configurable vocabulary
//! - Attribute and similarity retrieval strategies
//! - Result normalization with path deduplication
//! - Deterministic natural-language response rendering
//!
//! ## Example
//!
//! ```ignore
//! use inkdex_db::create_pool;
//! use inkdex_search::{looks_like_image_search, SearchOrchestrator};
//!
//! let pool = create_pool("postgres://...").await?;
//! let orchestrator = SearchOrchestrator::from_pool(pool);
//!
//! if looks_like_image_search(message) {
//!     let outcome = orchestrator.process_chat_request(message).await?;
//!     println!("{}", outcome.response);
//! }
//! ```

pub mod attribute;
pub mod gate;
pub mod interpreter;
pub mod normalize;
pub mod orchestrator;
pub mod respond;
pub mod similarity;
pub mod vocabulary;

// Re-export core types
pub use inkdex_core::*;

pub use attribute::{filter_for, AttributeStrategy};
pub use gate::looks_like_image_search;
pub use interpreter::QueryInterpreter;
pub use normalize::{filename_of, normalize, normalize_records};
pub use orchestrator::{SearchConfig, SearchOrchestrator};
pub use respond::{render, render_clarification};
pub use similarity::SimilarityStrategy;
pub use vocabulary::InterpreterVocabulary;
