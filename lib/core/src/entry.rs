use serde::{Deserialize, Serialize};
use crate::vector::Vector;

/// Description used when a known identifier has none.
pub const NO_DESCRIPTION: &str = "No description available";

/// One row of the corpus embeddings document.
///
/// Every field is optional on the wire so that a malformed row surfaces as a
/// [`SchemaError`](crate::SchemaError) during loading rather than a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingRecord {
    #[serde(alias = "filename", default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Text the vector was computed from, kept for debugging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl EmbeddingRecord {
    pub fn new(identifier: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            embedding_input: None,
            embedding: Some(embedding),
        }
    }

    #[must_use]
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.embedding_input = Some(input.into());
        self
    }
}

/// One row of the corpus descriptions document. Extra catalogue fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DescriptionRecord {
    #[serde(alias = "filename", default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DescriptionRecord {
    pub fn new(identifier: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            description: Some(description.into()),
        }
    }
}

/// An item of the corpus: identifier, embedding and display metadata.
///
/// Entries are built once by [`CorpusIndex::load`](crate::CorpusIndex::load) and are
/// only ever handed out by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusEntry {
    identifier: String,
    vector: Vector,
    description: Option<String>,
}

impl CorpusEntry {
    pub(crate) fn new(identifier: String, vector: Vector, description: Option<String>) -> Self {
        Self {
            identifier,
            vector,
            description,
        }
    }

    #[inline]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[inline]
    pub fn vector(&self) -> &Vector {
        &self.vector
    }

    /// Description, or [`NO_DESCRIPTION`] when the descriptions document lacked one.
    #[inline]
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or(NO_DESCRIPTION)
    }

    #[inline]
    pub fn has_description(&self) -> bool {
        self.description.is_some()
    }
}
