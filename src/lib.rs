//! # Hearth
//!
//! Image recommendations from a home-preference profile.
//!
//! A profile's descriptive fields are embedded into one query vector, every
//! image of a precomputed corpus is scored by cosine distance against it, and
//! the most and least similar images are returned with their descriptions.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! hearth serve --embeddings embeddings.json --descriptions descriptions.json --http-port 6333
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use hearth::prelude::*;
//! use std::sync::Arc;
//!
//! let provider: Arc<dyn EmbeddingProvider> = Arc::new(HashEmbedder::new(64));
//! let corpus = CorpusIndex::load_for(
//!     provider.as_ref(),
//!     vec![
//!         EmbeddingRecord::new("loft.jpg", provider.embed("bright airy loft").unwrap().into_inner()),
//!         EmbeddingRecord::new("den.jpg", provider.embed("dark wood den").unwrap().into_inner()),
//!     ],
//!     vec![DescriptionRecord::new("loft.jpg", "Bright loft")],
//! )
//! .unwrap();
//!
//! let profile = PreferenceProfile::from_json_str(
//!     r#"{"style_tags": {"aesthetic_style": "bright airy loft"}}"#,
//! )
//! .unwrap();
//!
//! let recommender = Recommender::new(provider, RecommenderConfig::default());
//! let doc = recommender.recommend(&corpus, &profile).unwrap();
//! assert_eq!(doc.inspirations[0].image_path, "/house-image/loft.jpg");
//! ```
//!
//! ## Crate Structure
//!
//! - `hearth-core` - Vectors, corpus index, errors, the embedding provider contract
//! - `hearth-profile` - Profile parsing, field aggregation, embedding providers
//! - `hearth-rank` - Cosine ranking and response assembly
//! - `hearth-storage` - Corpus documents, catalogue normalization, index building
//! - `hearth-api` - REST API

// Re-export core types
pub use hearth_core::{
    CorpusEntry, CorpusIndex, DescriptionRecord, EmbeddingProvider, EmbeddingRecord, Error,
    Result, SchemaError, Vector, NO_DESCRIPTION,
};

// Re-export profile handling
pub use hearth_profile::{
    create_provider, AggregatedQuery, EmbedderConfig, EmbedderKind, HashEmbedder, HttpEmbedder,
    PreferenceAggregator, PreferenceProfile,
};

// Re-export ranking
pub use hearth_rank::{
    rank, score, RankedItem, Ranking, RecommendationDocument, RecommendationMatch, Recommender,
    RecommenderConfig, ResultAssembler,
};

// Re-export storage
pub use hearth_storage::{CorpusSource, CorpusStatus, CorpusStore, LoadedCorpus};

// Re-export API
pub use hearth_api::{ApiState, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CorpusIndex, CorpusSource, CorpusStore, DescriptionRecord, EmbedderConfig,
        EmbeddingProvider, EmbeddingRecord, Error, HashEmbedder, PreferenceProfile,
        RecommendationDocument, Recommender, RecommenderConfig, Result, Vector,
    };
}
