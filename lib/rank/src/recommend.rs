//! End-to-end recommendation: profile → query vector → ranking → document.

use crate::assemble::{RecommendationDocument, ResultAssembler, DEFAULT_IMAGE_PREFIX};
use crate::rank::rank;
use hearth_core::{CorpusIndex, EmbeddingProvider, Result};
use hearth_profile::{PreferenceAggregator, PreferenceProfile};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Recommendation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Size of both the inspirations and least-matches lists.
    pub k: usize,
    pub image_prefix: String,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            k: 6,
            image_prefix: DEFAULT_IMAGE_PREFIX.to_string(),
        }
    }
}

/// Runs the full query pipeline against a corpus.
///
/// Holds no corpus state of its own, so one recommender can serve any number of
/// concurrent queries against any index.
#[derive(Debug, Clone)]
pub struct Recommender {
    aggregator: PreferenceAggregator,
    assembler: ResultAssembler,
    config: RecommenderConfig,
}

impl Recommender {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, config: RecommenderConfig) -> Self {
        Self {
            aggregator: PreferenceAggregator::new(provider),
            assembler: ResultAssembler::new(config.image_prefix.clone()),
            config,
        }
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    pub fn aggregator(&self) -> &PreferenceAggregator {
        &self.aggregator
    }

    pub fn assembler(&self) -> &ResultAssembler {
        &self.assembler
    }

    pub fn recommend(
        &self,
        corpus: &CorpusIndex,
        profile: &PreferenceProfile,
    ) -> Result<RecommendationDocument> {
        self.recommend_k(corpus, profile, self.config.k)
    }

    /// As [`recommend`](Self::recommend) with an explicit list size.
    pub fn recommend_k(
        &self,
        corpus: &CorpusIndex,
        profile: &PreferenceProfile,
        k: usize,
    ) -> Result<RecommendationDocument> {
        let query = self.aggregator.query(profile)?;
        let ranking = rank(&query.vector, corpus.entries())?;
        debug!(
            "Recommending top/bottom {} of {} ranked entries from {} aspects",
            k,
            ranking.len(),
            query.aspects.len()
        );
        Ok(self.assembler.assemble(corpus, &ranking, &query.aspects, k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::{DescriptionRecord, EmbeddingRecord, Error, Vector};
    use serde_json::json;

    /// Embeds by keyword: "bright" points east, "dark" west, anything else north.
    struct CompassEmbedder;

    impl EmbeddingProvider for CompassEmbedder {
        fn embed(&self, text: &str) -> Result<Vector> {
            let v = if text.contains("bright") {
                vec![1.0, 0.0]
            } else if text.contains("dark") {
                vec![-1.0, 0.0]
            } else {
                vec![0.0, 1.0]
            };
            Ok(Vector::new(v))
        }

        fn dimensions(&self) -> usize {
            2
        }

        fn model_name(&self) -> &str {
            "compass"
        }
    }

    fn corpus() -> CorpusIndex {
        CorpusIndex::load(
            vec![
                EmbeddingRecord::new("A", vec![1.0, 0.0]),
                EmbeddingRecord::new("B", vec![0.0, 1.0]),
                EmbeddingRecord::new("C", vec![-1.0, 0.0]),
            ],
            vec![DescriptionRecord::new("A", "Sunroom")],
        )
        .unwrap()
    }

    fn recommender(k: usize) -> Recommender {
        Recommender::new(
            Arc::new(CompassEmbedder),
            RecommenderConfig {
                k,
                ..RecommenderConfig::default()
            },
        )
    }

    #[test]
    fn test_end_to_end() {
        let profile = PreferenceProfile::from_value(&json!({
            "style_tags": { "aesthetic_style": "bright", "lighting_mood": "bright daylight" }
        }))
        .unwrap();

        let doc = recommender(1).recommend(&corpus(), &profile).unwrap();
        assert_eq!(doc.inspirations.len(), 1);
        assert_eq!(doc.inspirations[0].image_path, "/house-image/A");
        assert_eq!(doc.inspirations[0].description, "Sunroom");
        assert_eq!(doc.least_matches[0].image_path, "/house-image/C");
        assert_eq!(
            doc.least_matches[0].matching_aspects,
            vec!["bright", "bright daylight"]
        );
    }

    #[test]
    fn test_empty_profile_fails_query() {
        let profile = PreferenceProfile::from_value(&json!({ "persona_copy": "n/a" })).unwrap();
        assert!(matches!(
            recommender(6).recommend(&corpus(), &profile),
            Err(Error::EmptyProfile)
        ));
    }

    #[test]
    fn test_opposing_profile_is_undefined() {
        let profile = PreferenceProfile::from_value(&json!({
            "style_tags": { "aesthetic_style": "bright", "lighting_mood": "dark" }
        }))
        .unwrap();
        assert!(matches!(
            recommender(6).recommend(&corpus(), &profile),
            Err(Error::UndefinedSimilarity(_))
        ));
    }

    #[test]
    fn test_recommend_k_overrides_config() {
        let profile =
            PreferenceProfile::from_value(&json!({ "home_archetype": "bright" })).unwrap();
        let doc = recommender(1).recommend_k(&corpus(), &profile, 3).unwrap();
        assert_eq!(doc.inspirations.len(), 3);
        assert_eq!(doc.least_matches.len(), 3);
    }
}
