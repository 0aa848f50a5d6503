//! # Hearth Storage
//!
//! Everything that touches the filesystem:
//!
//! - [`documents`] - reading the corpus JSON documents, atomic writes
//! - [`CorpusStore`] - the live corpus, replaced wholesale on reload
//! - [`catalogue`] - normalizing the hand-curated image catalogue
//! - [`indexer`] - the offline pass that embeds the catalogue

pub mod catalogue;
pub mod documents;
pub mod indexer;
pub mod store;

pub use catalogue::{normalize_catalogue, normalize_catalogue_file, CatalogueRecord};
pub use documents::{read_descriptions, read_embeddings, write_json_atomic};
pub use indexer::{build_embeddings, build_index_file, embedding_input, DEFAULT_BATCH_SIZE};
pub use store::{CorpusSource, CorpusStatus, CorpusStore, LoadedCorpus};
