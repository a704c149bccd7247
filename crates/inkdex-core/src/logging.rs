//! Structured logging schema and field name constants for inkdex.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized field names across
//! every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events, operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-row iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "search", "db", "inference"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "interpreter", "orchestrator", "image_store", "embed_client"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "interpret", "search", "embed_image", "nearest_neighbors"
pub const OPERATION: &str = "op";

// ─── Query fields ──────────────────────────────────────────────────────────

/// Raw query text.
pub const QUERY: &str = "query";

/// Retrieval strategy selected for an intent.
pub const STRATEGY: &str = "strategy";

/// Canonical image path being operated on.
pub const PATH: &str = "path";

/// Similarity threshold applied to nearest-neighbor retrieval.
pub const THRESHOLD: &str = "threshold";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a search or query.
pub const RESULT_COUNT: &str = "result_count";

/// Authoritative total from the store's count query.
pub const TOTAL_COUNT: &str = "total_count";

/// Rows removed by path deduplication.
pub const DEDUPED: &str = "deduped";

// ─── Failure fields ────────────────────────────────────────────────────────

/// True when the slower fallback query tier served the request.
pub const FALLBACK: &str = "fallback";

/// SQLSTATE code of a store fault.
pub const SQLSTATE: &str = "sqlstate";
