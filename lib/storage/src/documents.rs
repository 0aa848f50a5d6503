use atomicwrites::{AtomicFile, OverwriteBehavior};
use hearth_core::{DescriptionRecord, EmbeddingRecord, Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Raw file contents, kept so callers can fingerprint what they parsed.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::Storage(format!("failed to read {}: {}", path.display(), e)))
}

/// Parse a JSON array document.
pub fn parse_array<T: DeserializeOwned>(path: &Path, bytes: &[u8]) -> Result<Vec<T>> {
    serde_json::from_slice(bytes)
        .map_err(|e| Error::Storage(format!("{} is not a valid document: {}", path.display(), e)))
}

pub fn read_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    parse_array(path, &read_bytes(path)?)
}

/// Corpus embeddings document: `[{ "identifier"|"filename", "embedding", "embedding_input"? }]`
pub fn read_embeddings(path: &Path) -> Result<Vec<EmbeddingRecord>> {
    read_array(path)
}

/// Corpus descriptions document: `[{ "identifier"|"filename", "description" }]`
pub fn read_descriptions(path: &Path) -> Result<Vec<DescriptionRecord>> {
    read_array(path)
}

/// Serialize `value` to `path` through a temporary file and rename, so readers see
/// either the old document or the complete new one.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|file| {
            if pretty {
                serde_json::to_writer_pretty(file, value)
            } else {
                serde_json::to_writer(file, value)
            }
        })
        .map_err(|e| Error::Storage(format!("failed to write {}: {}", path.display(), e)))
}
