//! Client for OpenAI-compatible `/embeddings` endpoints.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use lograg_core::config::EmbeddingSettings;
use lograg_core::traits::Embedder;
use lograg_core::Error;
use serde::{Deserialize, Serialize};

pub struct OpenAiEmbedder {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    model: String,
    dimensions: Option<usize>,
    id: String,
}

impl OpenAiEmbedder {
    pub fn new(base_url: &str, api_key: &str, model: &str, dimensions: Option<usize>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for embeddings")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            dimensions,
            id: format!("openai:{model}"),
        })
    }

    pub fn from_settings(settings: &EmbeddingSettings) -> lograg_core::Result<Self> {
        let api_key = settings.api_key().ok_or_else(|| {
            Error::InvalidConfig("embedding.api_key is not set and OPENAI_API_KEY is empty".into())
        })?;
        Self::new(
            &settings.base_url,
            &api_key,
            &settings.model,
            settings.dimensions,
            Duration::from_secs(settings.timeout_secs),
        )
        .map_err(|e| Error::InvalidConfig(format!("{e:#}")))
    }
}

impl Embedder for OpenAiEmbedder {
    fn embedder_id(&self) -> &str { &self.id }

    fn dim(&self) -> Option<usize> { self.dimensions }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() { return Ok(Vec::new()); }
        let url = format!("{}/embeddings", self.base_url);
        let request = EmbedRequest {
            model: &self.model,
            input: texts,
            dimensions: self.dimensions,
            encoding_format: "float",
        };
        tracing::debug!(url = %url, model = %self.model, inputs = texts.len(), "sending embedding request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .with_context(|| format!("Failed to send embedding request to {}", self.base_url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            bail!("Embedding endpoint returned {}: {}", status, body.trim());
        }
        let result: EmbedResponse = response.json().context("Failed to parse embedding response")?;
        order_by_index(result.data, texts.len())
    }
}

/// The API tags each vector with its input position; return them in input order.
fn order_by_index(mut data: Vec<EmbedData>, expected: usize) -> Result<Vec<Vec<f32>>> {
    if data.len() != expected {
        return Err(anyhow!("embedding endpoint returned {} vectors for {} inputs", data.len(), expected));
    }
    data.sort_by_key(|d| d.index);
    if data.iter().enumerate().any(|(i, d)| d.index != i) {
        bail!("embedding response indices are not a permutation of the inputs");
    }
    Ok(data.into_iter().map(|d| d.embedding).collect())
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
    encoding_format: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    index: usize,
    embedding: Vec<f32>,
}
