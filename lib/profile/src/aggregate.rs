//! Preference aggregation
//!
//! Collapses the ordered field texts of a profile into one query vector: every
//! field is embedded independently and the query is their element-wise mean.
//! The mean is deliberately left un-normalized; cosine distance downstream does
//! not depend on the query's magnitude.

use crate::profile::{extract_fields, PreferenceProfile};
use hearth_core::{EmbeddingProvider, Error, Result, Vector};
use std::sync::Arc;
use tracing::debug;

/// A query vector together with the texts it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedQuery {
    pub vector: Vector,
    /// Field texts in aggregation order, echoed to clients as "matching aspects".
    pub aspects: Vec<String>,
}

/// Embeds preference fields and averages them into a query vector
#[derive(Clone)]
pub struct PreferenceAggregator {
    provider: Arc<dyn EmbeddingProvider>,
}

impl PreferenceAggregator {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.provider
    }

    pub fn extract_fields(&self, profile: &PreferenceProfile) -> Vec<String> {
        extract_fields(profile)
    }

    /// Centroid of the embeddings of `fields`.
    ///
    /// # Errors
    /// - [`Error::EmptyProfile`] when `fields` is empty
    /// - [`Error::InvalidDimension`] when the provider returns a vector of the wrong size
    /// - any provider failure, which aborts the whole aggregation
    pub fn aggregate(&self, fields: &[String]) -> Result<Vector> {
        if fields.is_empty() {
            return Err(Error::EmptyProfile);
        }

        let texts: Vec<&str> = fields.iter().map(String::as_str).collect();
        let embeddings = self.provider.embed_batch(&texts)?;

        if embeddings.len() != fields.len() {
            return Err(Error::Embedding(format!(
                "provider returned {} embeddings for {} fields",
                embeddings.len(),
                fields.len()
            )));
        }

        let expected = self.provider.dimensions();
        if let Some(bad) = embeddings.iter().find(|v| v.dim() != expected) {
            return Err(Error::InvalidDimension {
                expected,
                actual: bad.dim(),
            });
        }

        let centroid = Vector::centroid(&embeddings).ok_or(Error::EmptyProfile)?;
        debug!(
            "Aggregated {} fields with {}: centroid norm {:.4}",
            fields.len(),
            self.provider.model_name(),
            centroid.norm()
        );
        Ok(centroid)
    }

    /// Extract, embed and average in one step.
    pub fn query(&self, profile: &PreferenceProfile) -> Result<AggregatedQuery> {
        let aspects = self.extract_fields(profile);
        let vector = self.aggregate(&aspects)?;
        Ok(AggregatedQuery { vector, aspects })
    }
}

impl std::fmt::Debug for PreferenceAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceAggregator")
            .field("model", &self.provider.model_name())
            .field("dimensions", &self.provider.dimensions())
            .finish()
    }
}
