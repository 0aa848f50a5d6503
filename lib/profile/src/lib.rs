//! # Hearth Profile
//!
//! Turns a user's preference profile into a single query vector.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   Profile    │────>│   Fields     │────>│  Embedding   │
//! │   (JSON)     │     │  (ordered)   │     │  Provider    │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!                                                  │
//!                                           ┌──────────────┐
//!                                           │   Centroid   │
//!                                           │ (query vec)  │
//!                                           └──────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use hearth_profile::{HashEmbedder, PreferenceAggregator, PreferenceProfile};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let profile = PreferenceProfile::from_value(&json!({
//!     "style_tags": { "aesthetic_style": "Japandi", "lighting_mood": "soft daylight" },
//!     "home_archetype": "gentle minimalist"
//! }))
//! .unwrap();
//!
//! let aggregator = PreferenceAggregator::new(Arc::new(HashEmbedder::new(64)));
//! let query = aggregator.query(&profile).unwrap();
//! assert_eq!(query.aspects.len(), 3);
//! assert_eq!(query.vector.dim(), 64);
//! ```

pub mod aggregate;
pub mod embedder;
pub mod profile;

pub use aggregate::{AggregatedQuery, PreferenceAggregator};
pub use embedder::{
    create_provider, EmbedderConfig, EmbedderKind, HashEmbedder, HttpEmbedder, DEFAULT_DIMENSIONS,
    DEFAULT_MODEL,
};
pub use profile::{
    extract_fields, FieldGroup, PreferenceProfile, ProfileField, HOME_ARCHETYPE,
    INTERNAL_REPORT_FIELDS, STYLE_TAG_FIELDS,
};
