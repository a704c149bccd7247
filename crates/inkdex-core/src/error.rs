//! Error types for inkdex.

use thiserror::Error;

/// Result type alias using inkdex's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for inkdex operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Both query tiers of a search strategy failed
    #[error("Search error: {0}")]
    Search(String),

    /// A required query parameter could not be resolved from the input
    #[error("Insufficient query: {0}")]
    InsufficientQuery(String),

    /// Reference path has no stored embedding vector
    #[error("No stored embedding for {0}")]
    MissingEmbedding(String),

    /// Embedding generation failed
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

impl Error {
    /// True when the fault must reach the caller typed instead of being
    /// rendered as an empty result set. "Nothing matched" and "search could
    /// not run" must stay distinguishable across the boundary.
    pub fn is_request_fatal(&self) -> bool {
        matches!(
            self,
            Error::MissingEmbedding(_) | Error::Embedding(_) | Error::InsufficientQuery(_)
        )
    }
}
