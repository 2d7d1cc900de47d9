//! OpenAI embeddings client.
//!
//! Calls the `/v1/embeddings` endpoint with retry. The API key is
//! wrapped in [`secrecy::SecretString`] and is never logged or included
//! in `Debug` output; a missing key only surfaces when an embedding is
//! actually requested, so offline deployments never need one.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use mnemo_core::embedder::Embedder;
use mnemo_core::retry::RetryPolicy;
use mnemo_types::error::MemoryError;

/// Embedder backed by the OpenAI embeddings API.
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
    model: String,
    dimension: usize,
    retry: RetryPolicy,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiEmbedder {
    pub fn new(
        api_key: Option<SecretString>,
        model: String,
        dimension: usize,
        retry: RetryPolicy,
    ) -> Result<Self, MemoryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MemoryError::ProviderUnavailable(e.to_string()))?;
        Ok(Self {
            client,
            api_key,
            base_url: "https://api.openai.com".to_string(),
            model,
            dimension,
            retry,
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    async fn request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, MemoryError> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            MemoryError::ProviderUnavailable("OPENAI_API_KEY is not set".to_string())
        })?;

        let response = self
            .client
            .post(format!("{}/v1/embeddings", self.base_url))
            .bearer_auth(api_key.expose_secret())
            .json(&json!({
                "model": self.model,
                "input": texts,
            }))
            .send()
            .await
            .map_err(|e| MemoryError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MemoryError::ProviderUnavailable(format!(
                "HTTP {status}: {body}"
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| MemoryError::ProviderUnavailable(format!("malformed response: {e}")))?;

        // The API may return entries out of order; index restores it.
        let mut data = parsed.data;
        data.sort_by_key(|d| d.index);
        if data.len() != texts.len() {
            return Err(MemoryError::ProviderUnavailable(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                data.len()
            )));
        }
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

impl Embedder for OpenAiEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, MemoryError> {
        self.retry
            .run("openai_embed", || self.request(texts))
            .await
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
