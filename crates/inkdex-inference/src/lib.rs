//! # inkdex-inference
//!
//! Embedding service client for inkdex.
//!
//! This crate provides:
//! - The HTTP client for the external image-embedding service
//! - A deterministic mock embedder for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use inkdex_core::ImageEmbedder;
//! use inkdex_inference::VisionEmbedClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = VisionEmbedClient::from_env();
//!     let bytes = std::fs::read("tattoo.jpg").unwrap();
//!     let vector = client.embed_image(&bytes).await.unwrap();
//!     println!("{} dims", vector.as_slice().len());
//! }
//! ```

pub mod embedder;
pub mod mock;

pub use embedder::{VisionEmbedClient, DEFAULT_EMBED_MODEL, DEFAULT_EMBED_URL};
pub use mock::MockImageEmbedder;
