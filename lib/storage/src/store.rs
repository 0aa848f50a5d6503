use crate::documents::{parse_array, read_bytes};
use chrono::{DateTime, Utc};
use hearth_core::{CorpusIndex, DescriptionRecord, EmbeddingProvider, EmbeddingRecord, Result};
use parking_lot::RwLock;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Where a corpus is loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusSource {
    pub embeddings: PathBuf,
    pub descriptions: PathBuf,
}

impl CorpusSource {
    pub fn new(embeddings: impl Into<PathBuf>, descriptions: impl Into<PathBuf>) -> Self {
        Self {
            embeddings: embeddings.into(),
            descriptions: descriptions.into(),
        }
    }

    /// Read, validate and join both documents.
    pub fn load(&self, provider: &dyn EmbeddingProvider) -> Result<LoadedCorpus> {
        let embeddings_bytes = read_bytes(&self.embeddings)?;
        let descriptions_bytes = read_bytes(&self.descriptions)?;

        let embeddings: Vec<EmbeddingRecord> = parse_array(&self.embeddings, &embeddings_bytes)?;
        let descriptions: Vec<DescriptionRecord> =
            parse_array(&self.descriptions, &descriptions_bytes)?;
        let index = CorpusIndex::load_for(provider, embeddings, descriptions)?;

        let mut hasher = Sha256::new();
        hasher.update(&embeddings_bytes);
        hasher.update(&descriptions_bytes);

        Ok(LoadedCorpus {
            index,
            fingerprint: format!("{:x}", hasher.finalize()),
            loaded_at: Utc::now(),
        })
    }
}

/// A corpus index together with where and when it came from
#[derive(Debug)]
pub struct LoadedCorpus {
    pub index: CorpusIndex,
    /// SHA-256 over the embeddings then descriptions document bytes.
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
}

impl LoadedCorpus {
    pub fn status(&self) -> CorpusStatus {
        CorpusStatus {
            size: self.index.size(),
            dimension: self.index.dim(),
            fingerprint: self.fingerprint.clone(),
            loaded_at: self.loaded_at,
            degraded_descriptions: self.index.degraded_descriptions(),
        }
    }
}

/// Summary of the live corpus for API responses
#[derive(Debug, Clone, Serialize)]
pub struct CorpusStatus {
    pub size: usize,
    pub dimension: Option<usize>,
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
    pub degraded_descriptions: usize,
}

/// Holds the live corpus and replaces it wholesale on reload.
///
/// Readers take an `Arc` snapshot and keep using it for the duration of their
/// query even if a reload happens meanwhile. A failed reload leaves the previous
/// corpus in place.
pub struct CorpusStore {
    source: CorpusSource,
    provider: Arc<dyn EmbeddingProvider>,
    current: RwLock<Arc<LoadedCorpus>>,
}

impl CorpusStore {
    pub fn open(source: CorpusSource, provider: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let loaded = source.load(provider.as_ref())?;
        info!(
            "Corpus store opened from {:?} ({} entries)",
            source.embeddings,
            loaded.index.size()
        );
        Ok(Self {
            source,
            provider,
            current: RwLock::new(Arc::new(loaded)),
        })
    }

    pub fn source(&self) -> &CorpusSource {
        &self.source
    }

    pub fn current(&self) -> Arc<LoadedCorpus> {
        self.current.read().clone()
    }

    /// Rebuild from the source documents and swap the new corpus in.
    pub fn reload(&self) -> Result<Arc<LoadedCorpus>> {
        let loaded = match self.source.load(self.provider.as_ref()) {
            Ok(loaded) => Arc::new(loaded),
            Err(e) => {
                error!("Corpus reload failed, keeping previous index: {}", e);
                return Err(e);
            }
        };

        *self.current.write() = loaded.clone();
        info!(
            "Corpus reloaded: {} entries, fingerprint {}",
            loaded.index.size(),
            loaded.fingerprint
        );
        Ok(loaded)
    }
}
