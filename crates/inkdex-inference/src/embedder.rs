//! HTTP client for the external image-embedding service.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use inkdex_core::{defaults, Error, ImageEmbedder, Result, Vector};

/// Default embedding service endpoint.
pub const DEFAULT_EMBED_URL: &str = defaults::EMBED_URL;

/// Default embedding model.
pub const DEFAULT_EMBED_MODEL: &str = defaults::EMBED_MODEL;

/// Default embedding dimension.
pub const DEFAULT_DIMENSION: usize = defaults::EMBED_DIMENSION;

/// Client for the vision embedding service.
///
/// Posts base64-encoded image bytes to `{base_url}/embed` and returns the
/// resulting vector. The service owns its own retries; this client only
/// applies a per-request timeout.
pub struct VisionEmbedClient {
    client: Client,
    base_url: String,
    model: String,
    dimension: usize,
    timeout_secs: u64,
}

impl VisionEmbedClient {
    /// Create a new client with default settings.
    pub fn new() -> Self {
        Self::with_config(
            DEFAULT_EMBED_URL.to_string(),
            DEFAULT_EMBED_MODEL.to_string(),
            DEFAULT_DIMENSION,
        )
    }

    /// Create a new client with custom configuration.
    pub fn with_config(base_url: String, model: String, dimension: usize) -> Self {
        let timeout_secs = std::env::var(defaults::ENV_EMBED_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::EMBED_TIMEOUT_SECS);

        info!(
            subsystem = "inference",
            component = "embed_client",
            op = "init",
            url = %base_url,
            model = %model,
            dimension,
            "Initializing embedding service client"
        );

        Self {
            client: Client::new(),
            base_url,
            model,
            dimension,
            timeout_secs,
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> Self {
        let base_url = std::env::var(defaults::ENV_EMBED_URL)
            .unwrap_or_else(|_| DEFAULT_EMBED_URL.to_string());
        let model = std::env::var(defaults::ENV_EMBED_MODEL)
            .unwrap_or_else(|_| DEFAULT_EMBED_MODEL.to_string());
        let dimension = std::env::var(defaults::ENV_EMBED_DIM)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_DIMENSION);

        Self::with_config(base_url, model, dimension)
    }

    /// Check if the embedding service is available and responding.
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/healthz", self.base_url);
        match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }
}

impl Default for VisionEmbedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct EmbedRequest {
    model: String,
    /// Base64-encoded image bytes.
    image: String,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

#[async_trait]
impl ImageEmbedder for VisionEmbedClient {
    async fn embed_image(&self, image_data: &[u8]) -> Result<Vector> {
        if image_data.is_empty() {
            return Err(Error::Embedding("empty image payload".to_string()));
        }

        let start = Instant::now();
        let image_b64 = base64::engine::general_purpose::STANDARD.encode(image_data);

        let request = EmbedRequest {
            model: self.model.clone(),
            image: image_b64,
        };

        let response = self
            .client
            .post(format!("{}/embed", self.base_url))
            .timeout(Duration::from_secs(self.timeout_secs))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Embedding(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Embedding(format!(
                "Embedding service returned {}: {}",
                status, body
            )));
        }

        let result: EmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::Embedding(format!("Failed to parse response: {}", e)))?;

        if result.embedding.len() != self.dimension {
            return Err(Error::Embedding(format!(
                "Expected {}-dim vector, got {}",
                self.dimension,
                result.embedding.len()
            )));
        }

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            subsystem = "inference",
            component = "embed_client",
            op = "embed_image",
            input_bytes = image_data.len(),
            duration_ms = elapsed,
            "Embedding generated"
        );
        if elapsed > 10_000 {
            warn!(
                subsystem = "inference",
                component = "embed_client",
                duration_ms = elapsed,
                input_bytes = image_data.len(),
                slow = true,
                "Slow embedding operation"
            );
        }

        Ok(Vector::from(result.embedding))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
