//! Mock embedding backend for deterministic testing.
//!
//! Generates embeddings derived from a hash of the input bytes, so the same
//! image always maps to the same vector without any external service.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use inkdex_core::{Error, ImageEmbedder, Result, Vector};

/// Mock image embedder for tests.
#[derive(Clone)]
pub struct MockImageEmbedder {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<usize>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    dimension: usize,
    fail_with: Option<String>,
}

impl MockImageEmbedder {
    /// Create a new mock with the given vector dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            config: Arc::new(MockConfig {
                dimension,
                fail_with: None,
            }),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make every embed call fail with the given message.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).fail_with = Some(message.into());
        self
    }

    /// Number of embed calls made so far.
    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    /// Byte lengths of the payloads seen so far.
    pub fn payload_sizes(&self) -> Vec<usize> {
        self.call_log.lock().unwrap().clone()
    }
}

/// FNV-1a over the payload; cheap and stable across runs.
fn hash_bytes(data: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in data {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[async_trait]
impl ImageEmbedder for MockImageEmbedder {
    async fn embed_image(&self, image_data: &[u8]) -> Result<Vector> {
        self.call_log.lock().unwrap().push(image_data.len());

        if let Some(message) = &self.config.fail_with {
            return Err(Error::Embedding(message.clone()));
        }

        let seed = hash_bytes(image_data);
        let values: Vec<f32> = (0..self.config.dimension)
            .map(|i| {
                let v = seed.wrapping_add(i as u64).wrapping_mul(0x9e3779b97f4a7c15);
                // Map into [-1, 1]
                ((v >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0) as f32
            })
            .collect();

        Ok(Vector::from(values))
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    fn model_name(&self) -> &str {
        "mock-embedder"
    }
}
