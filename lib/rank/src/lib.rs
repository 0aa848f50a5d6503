//! # Hearth Rank
//!
//! Scores a query vector against the corpus and shapes the recommendation
//! document.
//!
//! - [`score`] - cosine distance, `0` for identical direction up to `2` for opposite
//! - [`rank`] - one ascending ordering of the whole corpus, ties broken by identifier
//! - [`Ranking::top_k`] / [`Ranking::bottom_k`] - prefix and suffix of that ordering
//! - [`ResultAssembler`] - joins identifiers back to descriptions and image paths
//! - [`Recommender`] - profile in, [`RecommendationDocument`] out
//!
//! ## Example
//!
//! ```rust
//! use hearth_core::{CorpusIndex, EmbeddingRecord, Vector};
//! use hearth_rank::rank;
//!
//! let corpus = CorpusIndex::load(
//!     vec![
//!         EmbeddingRecord::new("A", vec![1.0, 0.0]),
//!         EmbeddingRecord::new("B", vec![0.0, 1.0]),
//!         EmbeddingRecord::new("C", vec![-1.0, 0.0]),
//!     ],
//!     vec![],
//! )
//! .unwrap();
//!
//! let ranking = rank(&Vector::new(vec![1.0, 0.0]), corpus.entries()).unwrap();
//! assert_eq!(ranking.top_k(1)[0].identifier, "A");
//! assert_eq!(ranking.bottom_k(1)[0].identifier, "C");
//! ```

pub mod assemble;
pub mod distance;
pub mod rank;
pub mod recommend;

pub use assemble::{
    RecommendationDocument, RecommendationMatch, ResultAssembler, DEFAULT_IMAGE_PREFIX,
};
pub use distance::score;
pub use rank::{bottom_k, rank, top_k, RankedItem, Ranking};
pub use recommend::{Recommender, RecommenderConfig};
