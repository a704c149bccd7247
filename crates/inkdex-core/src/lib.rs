//! # inkdex-core
//!
//! Core types, traits, and abstractions for the inkdex image-search library.
//!
//! This crate provides the foundational data structures and trait definitions
//! that other inkdex crates depend on.

pub mod defaults;
pub mod error;
pub mod intent;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use intent::{clamp_limit, SearchIntent, StrategyKind};
pub use models::{
    synthesize_id, ChatSearchOutcome, EmbeddingKind, ImageAttributes, ImageRecord, ImageRow,
    SearchPage, Vector,
};
pub use traits::{
    AttributeFilter, EmbeddingStore, ImageEmbedder, ImageStore, NoOpProgress, ProgressSink,
};
