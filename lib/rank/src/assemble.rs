//! Output document assembly
//!
//! Joins ranked identifiers back to corpus metadata and shapes the response
//! returned to clients.

use crate::rank::{RankedItem, Ranking};
use hearth_core::{CorpusIndex, NO_DESCRIPTION};
use serde::{Deserialize, Serialize};

/// Default prefix turning an identifier into a displayable image path
pub const DEFAULT_IMAGE_PREFIX: &str = "/house-image/";

/// One recommended (or anti-recommended) image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationMatch {
    pub image_path: String,
    pub description: String,
    /// Cosine distance to the query: lower is more similar.
    pub relevance_score: f32,
    /// The profile texts the query was built from; identical for every match.
    pub matching_aspects: Vec<String>,
}

/// Response document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationDocument {
    /// Most similar first.
    pub inspirations: Vec<RecommendationMatch>,
    /// The least similar tail of the same ordering, least similar last.
    pub least_matches: Vec<RecommendationMatch>,
}

/// Builds [`RecommendationDocument`]s from rankings
#[derive(Debug, Clone)]
pub struct ResultAssembler {
    image_prefix: String,
}

impl Default for ResultAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_PREFIX)
    }
}

impl ResultAssembler {
    pub fn new(image_prefix: impl Into<String>) -> Self {
        Self {
            image_prefix: image_prefix.into(),
        }
    }

    pub fn image_prefix(&self) -> &str {
        &self.image_prefix
    }

    pub fn image_path(&self, identifier: &str) -> String {
        format!("{}{}", self.image_prefix, identifier)
    }

    /// Shape a single ranked item. Unknown identifiers get the sentinel description.
    pub fn assemble_match(
        &self,
        corpus: &CorpusIndex,
        item: &RankedItem,
        aspects: &[String],
    ) -> RecommendationMatch {
        let description = corpus
            .get(&item.identifier)
            .map(|entry| entry.description())
            .unwrap_or(NO_DESCRIPTION);

        RecommendationMatch {
            image_path: self.image_path(&item.identifier),
            description: description.to_string(),
            relevance_score: item.score,
            matching_aspects: aspects.to_vec(),
        }
    }

    /// Top `k` as inspirations and bottom `k` as least matches.
    ///
    /// Both lists come from the same ranking; they overlap only when the
    /// ranking holds fewer than `2k` items.
    pub fn assemble(
        &self,
        corpus: &CorpusIndex,
        ranking: &Ranking,
        aspects: &[String],
        k: usize,
    ) -> RecommendationDocument {
        let shape = |items: &[RankedItem]| -> Vec<RecommendationMatch> {
            items
                .iter()
                .map(|item| self.assemble_match(corpus, item, aspects))
                .collect()
        };

        RecommendationDocument {
            inspirations: shape(ranking.top_k(k)),
            least_matches: shape(ranking.bottom_k(k)),
        }
    }
}
