//! # inkdex-db
//!
//! PostgreSQL + pgvector store layer for inkdex.
//!
//! This crate provides:
//! - Connection pool management
//! - Attribute-filtered image search with primary/fallback query tiers
//! - Stored-embedding lookup and nearest-neighbor retrieval with pgvector
//!
//! ## Example
//!
//! ```rust,ignore
//! use inkdex_core::{AttributeFilter, ImageStore};
//! use inkdex_db::{create_pool, PgImageStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool("postgres://localhost/inkdex").await?;
//!     let store = PgImageStore::new(pool);
//!
//!     let filter = AttributeFilter::BodyPart { part: "arm".into() };
//!     let rows = store.search(&filter, 20, 0).await?;
//!     println!("matched {} rows", rows.len());
//!     Ok(())
//! }
//! ```

pub mod embeddings;
pub mod images;
pub mod pool;

// Re-export core types
pub use inkdex_core::*;

pub use embeddings::PgEmbeddingStore;
pub use images::{is_unavailability_fault, PgImageStore};
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
