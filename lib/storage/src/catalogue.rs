//! Catalogue normalization
//!
//! The hand-curated image catalogue mixes two spellings of every key: display
//! labels holding lists of tags (`"Aesthetic Style": ["Japandi", "Wabi-sabi"]`)
//! and canonical snake_case keys holding plain strings. Normalization produces the
//! canonical form only.

use crate::documents::{read_array, write_json_atomic};
use hearth_core::{Result, SchemaError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::info;

/// One catalogue image in canonical form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogueRecord {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub aesthetic_style: String,
    #[serde(default)]
    pub material_texture: String,
    #[serde(default)]
    pub lighting_mood: String,
    #[serde(default)]
    pub room_typology: String,
    #[serde(default)]
    pub emotional_imagery: String,
    #[serde(default)]
    pub persona_cues: String,
}

/// (display label, canonical key) for every tag field
const TAG_KEYS: [(&str, &str); 6] = [
    ("Aesthetic Style", "aesthetic_style"),
    ("Material & Texture", "material_texture"),
    ("Lighting & Mood", "lighting_mood"),
    ("Room Typology", "room_typology"),
    ("Emotional Imagery", "emotional_imagery"),
    ("Persona cues", "persona_cues"),
];

/// Normalize every item of a raw catalogue.
pub fn normalize_catalogue(raw: &[Value]) -> Result<Vec<CatalogueRecord>> {
    raw.iter()
        .enumerate()
        .map(|(position, item)| {
            let obj = item.as_object().ok_or_else(|| SchemaError::MalformedRecord {
                position,
                reason: "expected an object".to_string(),
            })?;
            normalize_record(position, obj)
        })
        .collect()
}

fn normalize_record(position: usize, obj: &Map<String, Value>) -> Result<CatalogueRecord> {
    let filename = either_string(obj, "Filename", "filename")
        .filter(|f| !f.is_empty())
        .ok_or(SchemaError::MissingIdentifier(position))?;

    let mut tags: [String; 6] = Default::default();
    for (slot, (label, key)) in tags.iter_mut().zip(TAG_KEYS) {
        *slot = match obj.get(label) {
            Some(value) => join_tags(value),
            None => obj.get(key).and_then(Value::as_str).unwrap_or_default().to_string(),
        };
    }
    let [
        aesthetic_style,
        material_texture,
        lighting_mood,
        room_typology,
        emotional_imagery,
        persona_cues,
    ] = tags;

    Ok(CatalogueRecord {
        filename,
        description: either_string(obj, "Description", "description"),
        aesthetic_style,
        material_texture,
        lighting_mood,
        room_typology,
        emotional_imagery,
        persona_cues,
    })
}

fn either_string(obj: &Map<String, Value>, label: &str, key: &str) -> Option<String> {
    obj.get(label)
        .or_else(|| obj.get(key))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn join_tags(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Read a raw catalogue, normalize it and write the canonical catalogue.
pub fn normalize_catalogue_file(input: &Path, output: &Path) -> Result<usize> {
    let raw: Vec<Value> = read_array(input)?;
    let records = normalize_catalogue(&raw)?;
    write_json_atomic(output, &records, true)?;
    info!("Normalized {} catalogue records into {:?}", records.len(), output);
    Ok(records.len())
}
