//! # Hearth Core
//!
//! Core library for the Hearth image recommender.
//!
//! This crate provides the fundamental data structures:
//!
//! - [`Vector`] - Dense embedding vector with SIMD-friendly kernels
//! - [`CorpusEntry`] - An item identifier with its vector and description
//! - [`CorpusIndex`] - The immutable, load-once catalogue of entries
//! - [`EmbeddingProvider`] - The contract for turning text into vectors
//!
//! ## Example
//!
//! ```rust
//! use hearth_core::{CorpusIndex, DescriptionRecord, EmbeddingRecord, NO_DESCRIPTION};
//!
//! let index = CorpusIndex::load(
//!     vec![
//!         EmbeddingRecord::new("kitchen.jpg", vec![1.0, 0.0]),
//!         EmbeddingRecord::new("study.jpg", vec![0.0, 1.0]),
//!     ],
//!     vec![DescriptionRecord::new("kitchen.jpg", "Sunlit farmhouse kitchen")],
//! )
//! .unwrap();
//!
//! assert_eq!(index.size(), 2);
//! assert_eq!(index.get("study.jpg").unwrap().description(), NO_DESCRIPTION);
//! ```

pub mod corpus;
pub mod entry;
pub mod error;
pub mod provider;
pub mod vector;

/// Dot product and norm kernels
///
/// AVX2/FMA on x86_64, unrolled scalar code elsewhere.
pub mod simd;

pub use corpus::CorpusIndex;
pub use entry::{CorpusEntry, DescriptionRecord, EmbeddingRecord, NO_DESCRIPTION};
pub use error::{Error, Result, SchemaError};
pub use provider::EmbeddingProvider;
pub use vector::{Vector, ZERO_NORM_EPSILON};
