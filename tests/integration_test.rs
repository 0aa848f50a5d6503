// End-to-end tests for Hearth
use hearth::prelude::*;
use hearth_core::{SchemaError, NO_DESCRIPTION};
use hearth_storage::{build_index_file, normalize_catalogue_file, write_json_atomic};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

/// "bright" points east, "dark" west, everything else north.
struct CompassEmbedder;

impl EmbeddingProvider for CompassEmbedder {
    fn embed(&self, text: &str) -> Result<Vector> {
        Ok(Vector::new(if text.contains("bright") {
            vec![1.0, 0.0]
        } else if text.contains("dark") {
            vec![-1.0, 0.0]
        } else {
            vec![0.0, 1.0]
        }))
    }

    fn dimensions(&self) -> usize {
        2
    }

    fn model_name(&self) -> &str {
        "compass"
    }
}

fn write_corpus(dir: &TempDir) -> CorpusSource {
    let source = CorpusSource::new(
        dir.path().join("embeddings.json"),
        dir.path().join("descriptions.json"),
    );
    write_json_atomic(
        &source.embeddings,
        &vec![
            EmbeddingRecord::new("A.jpg", vec![1.0, 0.0]),
            EmbeddingRecord::new("B.jpg", vec![0.0, 1.0]),
            EmbeddingRecord::new("C.jpg", vec![-1.0, 0.0]),
        ],
        true,
    )
    .unwrap();
    write_json_atomic(
        &source.descriptions,
        &vec![
            DescriptionRecord::new("A.jpg", "Sunlit loft"),
            DescriptionRecord::new("C.jpg", "Moody library"),
        ],
        true,
    )
    .unwrap();
    source
}

#[test]
fn test_recommend_from_files() {
    let dir = TempDir::new().unwrap();
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(CompassEmbedder);
    let loaded = write_corpus(&dir).load(provider.as_ref()).unwrap();
    assert_eq!(loaded.index.size(), 3);
    assert_eq!(loaded.index.degraded_descriptions(), 1);

    let profile = PreferenceProfile::from_value(&json!({
        "internal_report": { "aesthetic_style": "bright and open" },
        "style_tags": { "lighting_mood": "bright daylight" },
        "home_archetype": "bright"
    }))
    .unwrap();

    let recommender = Recommender::new(
        provider,
        RecommenderConfig {
            k: 2,
            ..RecommenderConfig::default()
        },
    );
    let doc = recommender.recommend(&loaded.index, &profile).unwrap();

    let inspirations: Vec<&str> = doc.inspirations.iter().map(|m| m.image_path.as_str()).collect();
    let least: Vec<&str> = doc.least_matches.iter().map(|m| m.image_path.as_str()).collect();
    assert_eq!(inspirations, vec!["/house-image/A.jpg", "/house-image/B.jpg"]);
    assert_eq!(least, vec!["/house-image/B.jpg", "/house-image/C.jpg"]);

    assert!(doc.inspirations[0].relevance_score.abs() < 1e-6);
    assert!((doc.least_matches[1].relevance_score - 2.0).abs() < 1e-6);
    assert_eq!(doc.inspirations[0].description, "Sunlit loft");
    assert_eq!(doc.inspirations[1].description, NO_DESCRIPTION);
    assert_eq!(
        doc.inspirations[0].matching_aspects,
        vec!["bright and open", "bright daylight", "bright"]
    );
}

#[test]
fn test_empty_profile_is_rejected() {
    let dir = TempDir::new().unwrap();
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(CompassEmbedder);
    let loaded = write_corpus(&dir).load(provider.as_ref()).unwrap();

    let profile = PreferenceProfile::from_value(&json!({ "persona_copy": "ignored" })).unwrap();
    let recommender = Recommender::new(provider, RecommenderConfig::default());
    assert!(matches!(
        recommender.recommend(&loaded.index, &profile),
        Err(Error::EmptyProfile)
    ));
}

#[test]
fn test_corpus_dimension_must_match_provider() {
    let dir = TempDir::new().unwrap();
    let provider = HashEmbedder::new(8);
    assert!(matches!(
        write_corpus(&dir).load(&provider),
        Err(Error::InvalidDimension { expected: 8, actual: 2 })
    ));
}

#[test]
fn test_duplicate_identifiers_fail_the_load() {
    let dir = TempDir::new().unwrap();
    let source = write_corpus(&dir);
    write_json_atomic(
        &source.embeddings,
        &vec![
            EmbeddingRecord::new("A.jpg", vec![1.0, 0.0]),
            EmbeddingRecord::new("A.jpg", vec![0.0, 1.0]),
        ],
        false,
    )
    .unwrap();

    assert!(matches!(
        source.load(&CompassEmbedder),
        Err(Error::Schema(SchemaError::DuplicateIdentifier(id))) if id == "A.jpg"
    ));
}

#[test]
fn test_offline_pipeline() {
    let dir = TempDir::new().unwrap();
    let raw = dir.path().join("raw.json");
    let catalogue = dir.path().join("catalogue.json");
    let embeddings = dir.path().join("embeddings.json");

    write_json_atomic(
        &raw,
        &json!([
            {
                "Filename": "loft.jpg",
                "Description": "Bright airy loft",
                "Aesthetic Style": ["industrial", "minimal"],
                "Lighting & Mood": "bright"
            },
            {
                "Filename": "den.jpg",
                "Description": "Dark wood den",
                "Material & Texture": "walnut"
            }
        ]),
        false,
    )
    .unwrap();

    assert_eq!(normalize_catalogue_file(&raw, &catalogue).unwrap(), 2);

    let provider: Arc<dyn EmbeddingProvider> = Arc::new(HashEmbedder::new(32));
    assert_eq!(build_index_file(&catalogue, &embeddings, provider.as_ref(), 1).unwrap(), 2);

    let source = CorpusSource::new(&embeddings, &catalogue);
    let store = CorpusStore::open(source, provider.clone()).unwrap();
    let corpus = store.current();
    assert_eq!(corpus.index.size(), 2);
    assert_eq!(corpus.index.dim(), Some(32));
    assert_eq!(corpus.index.get("loft.jpg").unwrap().description(), "Bright airy loft");

    let recommender = Recommender::new(provider, RecommenderConfig::default());
    let profile = PreferenceProfile::from_json_str(r#"{"home_archetype": "the den"}"#).unwrap();
    let doc = recommender.recommend(&corpus.index, &profile).unwrap();
    assert_eq!(doc.inspirations.len(), 2);
    assert_eq!(doc.least_matches.len(), 2);
}
