//! Offline corpus index building
//!
//! Each catalogue record is flattened into one descriptive sentence, embedded,
//! and written out as an embeddings document the query side can load.

use crate::catalogue::CatalogueRecord;
use crate::documents::{read_array, write_json_atomic};
use hearth_core::{EmbeddingProvider, EmbeddingRecord, Error, Result};
use std::path::Path;
use tracing::{debug, info};

/// Texts sent to the provider per batch
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// The text a catalogue image is embedded from.
pub fn embedding_input(record: &CatalogueRecord) -> String {
    format!(
        "{}. Style: {}. Material: {}. Lighting: {}. Room type: {}. Emotion: {}. Persona: {}.",
        record.description.as_deref().unwrap_or_default(),
        record.aesthetic_style,
        record.material_texture,
        record.lighting_mood,
        record.room_typology,
        record.emotional_imagery,
        record.persona_cues,
    )
}

/// Embed every record, preserving catalogue order.
pub fn build_embeddings(
    records: &[CatalogueRecord],
    provider: &dyn EmbeddingProvider,
    batch_size: usize,
) -> Result<Vec<EmbeddingRecord>> {
    let batch_size = batch_size.max(1);
    let inputs: Vec<String> = records.iter().map(embedding_input).collect();
    let mut output = Vec::with_capacity(records.len());

    for (batch_no, (chunk, texts)) in records
        .chunks(batch_size)
        .zip(inputs.chunks(batch_size))
        .enumerate()
    {
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let vectors = provider.embed_batch(&refs)?;
        if vectors.len() != chunk.len() {
            return Err(Error::Embedding(format!(
                "provider returned {} embeddings for {} texts",
                vectors.len(),
                chunk.len()
            )));
        }

        for ((record, text), vector) in chunk.iter().zip(texts).zip(vectors) {
            if vector.dim() != provider.dimensions() {
                return Err(Error::InvalidDimension {
                    expected: provider.dimensions(),
                    actual: vector.dim(),
                });
            }
            output.push(
                EmbeddingRecord::new(record.filename.clone(), vector.into_inner())
                    .with_input(text.clone()),
            );
        }
        debug!("Embedded batch {} ({} records)", batch_no, chunk.len());
    }

    Ok(output)
}

/// Read a canonical catalogue, embed it and write the embeddings document.
pub fn build_index_file(
    catalogue: &Path,
    output: &Path,
    provider: &dyn EmbeddingProvider,
    batch_size: usize,
) -> Result<usize> {
    let records: Vec<CatalogueRecord> = read_array(catalogue)?;
    let embeddings = build_embeddings(&records, provider, batch_size)?;
    write_json_atomic(output, &embeddings, false)?;
    info!(
        "Wrote {} embeddings ({} dims, model {}) to {:?}",
        embeddings.len(),
        provider.dimensions(),
        provider.model_name(),
        output
    );
    Ok(embeddings.len())
}
