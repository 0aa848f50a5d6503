//! Embedding providers
//!
//! Two implementations of [`EmbeddingProvider`]:
//!
//! - [`HashEmbedder`] hashes character trigrams and words into a fixed number of
//!   buckets. Deterministic, offline, good enough for demos and tests.
//! - [`HttpEmbedder`] calls an OpenAI-compatible `/v1/embeddings` endpoint.
//!
//! Providers are constructed explicitly (see [`create_provider`]) and passed to
//! whatever needs them.

use ahash::RandomState;
use hearth_core::{EmbeddingProvider, Error, Result, Vector};
use serde::{Deserialize, Serialize};
use std::hash::BuildHasher;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Default embedding dimension (CLIP ViT-B/32 text features)
pub const DEFAULT_DIMENSIONS: usize = 512;

/// Default model name reported by providers
pub const DEFAULT_MODEL: &str = "clip-vit-base-patch32";

const HASH_SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// Which provider implementation to construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    #[default]
    Hash,
    Http,
}

impl FromStr for EmbedderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hash" => Ok(EmbedderKind::Hash),
            "http" => Ok(EmbedderKind::Http),
            other => Err(Error::InvalidConfig(format!(
                "unknown embedder '{}', expected 'hash' or 'http'",
                other
            ))),
        }
    }
}

/// Embedding provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedderConfig {
    pub kind: EmbedderKind,
    /// Endpoint for [`EmbedderKind::Http`]
    pub url: Option<String>,
    pub model: String,
    pub dimensions: usize,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            kind: EmbedderKind::Hash,
            url: None,
            model: DEFAULT_MODEL.to_string(),
            dimensions: DEFAULT_DIMENSIONS,
            api_key: None,
            timeout_secs: 30,
        }
    }
}

/// Build the provider described by `config`.
pub fn create_provider(config: &EmbedderConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    if config.dimensions == 0 {
        return Err(Error::InvalidConfig("embedding dimensions must be positive".into()));
    }

    match config.kind {
        EmbedderKind::Hash => {
            info!("Using hash embedder ({} dims)", config.dimensions);
            Ok(Arc::new(HashEmbedder::new(config.dimensions)))
        }
        EmbedderKind::Http => {
            let url = config
                .url
                .clone()
                .ok_or_else(|| Error::InvalidConfig("the http embedder needs a url".into()))?;
            info!("Using http embedder {} at {} ({} dims)", config.model, url, config.dimensions);
            Ok(Arc::new(HttpEmbedder::new(
                url,
                config.model.clone(),
                config.dimensions,
                config.api_key.clone(),
                Duration::from_secs(config.timeout_secs),
            )?))
        }
    }
}

/// Feature-hashing embedder
///
/// Lower-cased character trigrams (weight 1) and whitespace-separated words
/// (weight 2) are hashed into `dim` buckets with a hash-derived sign, then the
/// vector is L2-normalized. Seeds are fixed, so the same text always yields the
/// same vector.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
    state: RandomState,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            state: RandomState::with_seeds(
                HASH_SEEDS[0],
                HASH_SEEDS[1],
                HASH_SEEDS[2],
                HASH_SEEDS[3],
            ),
        }
    }

    fn add_feature(&self, buckets: &mut [f32], feature: &str, weight: f32) {
        let hash = self.state.hash_one(feature);
        let pos = (hash % self.dim as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        buckets[pos] += sign * weight;
    }
}

impl EmbeddingProvider for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vector> {
        if self.dim == 0 {
            return Err(Error::InvalidConfig("hash embedder needs at least one dimension".into()));
        }
        let normalized = text.to_lowercase();
        let mut buckets = vec![0.0f32; self.dim];

        let padded: Vec<char> = format!("  {}  ", normalized).chars().collect();
        for window in padded.windows(3) {
            let trigram: String = window.iter().collect();
            self.add_feature(&mut buckets, &trigram, 1.0);
        }
        for word in normalized.split_whitespace() {
            self.add_feature(&mut buckets, word, 2.0);
        }

        let mut vector = Vector::new(buckets);
        vector.normalize();
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dim
    }

    fn model_name(&self) -> &str {
        "hash"
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

/// Client for an OpenAI-compatible embeddings endpoint
///
/// Blocking: call it from a worker thread, not from inside an async executor.
pub struct HttpEmbedder {
    client: reqwest::blocking::Client,
    url: String,
    model: String,
    dim: usize,
    api_key: Option<String>,
}

impl HttpEmbedder {
    pub fn new(
        url: String,
        model: String,
        dim: usize,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            url,
            model,
            dim,
            api_key,
        })
    }
}

impl EmbeddingProvider for HttpEmbedder {
    fn embed(&self, text: &str) -> Result<Vector> {
        self.embed_batch(&[text])?
            .pop()
            .ok_or_else(|| Error::Embedding("empty response".into()))
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut request = self.client.post(&self.url).json(&EmbeddingRequest {
            model: &self.model,
            input: texts,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .map_err(|e| Error::Embedding(format!("request to {} failed: {}", self.url, e)))?;
        if !response.status().is_success() {
            return Err(Error::Embedding(format!(
                "{} returned HTTP {}",
                self.url,
                response.status()
            )));
        }

        let body: EmbeddingResponse = response
            .json()
            .map_err(|e| Error::Embedding(format!("invalid response body: {}", e)))?;
        debug!("Embedded {} texts via {}", texts.len(), self.url);
        collect_embeddings(body, texts.len(), self.dim)
    }

    fn dimensions(&self) -> usize {
        self.dim
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Place response items by their `index` (falling back to position), check the
/// dimension and normalize each vector.
fn collect_embeddings(body: EmbeddingResponse, expected: usize, dim: usize) -> Result<Vec<Vector>> {
    let mut slots: Vec<Option<Vector>> = vec![None; expected];

    for (position, datum) in body.data.into_iter().enumerate() {
        let slot = datum.index.unwrap_or(position);
        if slot >= expected {
            return Err(Error::Embedding(format!("response index {} out of range", slot)));
        }
        if datum.embedding.len() != dim {
            return Err(Error::InvalidDimension {
                expected: dim,
                actual: datum.embedding.len(),
            });
        }
        slots[slot] = Some(Vector::new(datum.embedding).normalized());
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(i, slot)| {
            slot.ok_or_else(|| Error::Embedding(format!("no embedding returned for input {}", i)))
        })
        .collect()
}
