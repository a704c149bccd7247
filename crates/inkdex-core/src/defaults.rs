//! Centralized default constants for the inkdex system.
//!
//! **This module is the single source of truth** for all shared default
//! values. Crates reference these constants instead of defining their own
//! magic numbers. When adding new constants, place them in the appropriate
//! section and document the rationale for the chosen value.

// =============================================================================
// RESULT LIMITS
// =============================================================================

/// Smallest accepted result limit.
pub const LIMIT_MIN: i64 = 1;

/// Largest accepted result limit; extracted numbers above this are clamped.
pub const LIMIT_MAX: i64 = 50;

/// Default result limit for chat-initiated searches.
pub const CHAT_LIMIT: i64 = 12;

/// Default page size for paginated browse UIs.
pub const BROWSE_PAGE_SIZE: i64 = 20;

/// Default page offset.
pub const PAGE_OFFSET: i64 = 0;

// =============================================================================
// SIMILARITY
// =============================================================================

/// Minimum cosine similarity for a nearest-neighbor candidate to be kept.
/// 0.5 filters unrelated content while keeping loose stylistic matches.
pub const SIMILARITY_THRESHOLD: f32 = 0.5;

/// Default embedding vector dimension (CLIP ViT-B/32).
pub const EMBED_DIMENSION: usize = 512;

// =============================================================================
// EMBEDDING SERVICE
// =============================================================================

/// Default embedding service base URL.
pub const EMBED_URL: &str = "http://127.0.0.1:8191";

/// Default embedding model name.
pub const EMBED_MODEL: &str = "clip-vit-b32";

/// Timeout for embedding requests in seconds.
pub const EMBED_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// PROGRESS CHECKPOINTS
// =============================================================================
// Advisory percentages reported during the embed→search pipeline.

/// Query-vector resolution started.
pub const PROGRESS_RESOLVE: u8 = 10;

/// Query vector is ready.
pub const PROGRESS_VECTOR_READY: u8 = 40;

/// Nearest-neighbor retrieval started.
pub const PROGRESS_SEARCH: u8 = 60;

/// Nearest-neighbor retrieval finished.
pub const PROGRESS_SEARCH_DONE: u8 = 90;

/// Results normalized and returned.
pub const PROGRESS_COMPLETE: u8 = 100;

// =============================================================================
// ENVIRONMENT VARIABLES
// =============================================================================

/// Embedding service base URL override.
pub const ENV_EMBED_URL: &str = "INKDEX_EMBED_URL";

/// Embedding model name override.
pub const ENV_EMBED_MODEL: &str = "INKDEX_EMBED_MODEL";

/// Embedding request timeout override (seconds).
pub const ENV_EMBED_TIMEOUT_SECS: &str = "INKDEX_EMBED_TIMEOUT_SECS";

/// Embedding dimension override.
pub const ENV_EMBED_DIM: &str = "INKDEX_EMBED_DIM";

/// PostgreSQL connection string.
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

/// Connection pool size override.
pub const ENV_POOL_MAX_CONNECTIONS: &str = "INKDEX_POOL_MAX_CONNECTIONS";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_bounds_are_sane() {
        assert!(LIMIT_MIN >= 1);
        assert!(LIMIT_MAX > LIMIT_MIN);
        assert!(CHAT_LIMIT >= LIMIT_MIN && CHAT_LIMIT <= LIMIT_MAX);
        assert!(BROWSE_PAGE_SIZE >= LIMIT_MIN && BROWSE_PAGE_SIZE <= LIMIT_MAX);
    }

    #[test]
    fn test_progress_checkpoints_monotonic() {
        let checkpoints = [
            PROGRESS_RESOLVE,
            PROGRESS_VECTOR_READY,
            PROGRESS_SEARCH,
            PROGRESS_SEARCH_DONE,
            PROGRESS_COMPLETE,
        ];
        assert!(checkpoints.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(PROGRESS_COMPLETE, 100);
    }

    #[test]
    fn test_similarity_threshold_in_range() {
        assert!((0.0..=1.0).contains(&SIMILARITY_THRESHOLD));
    }
}
