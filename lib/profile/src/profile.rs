//! Preference profile documents
//!
//! A profile is produced upstream by a text-generation step and arrives as loosely
//! shaped JSON. This module turns it into a typed, ordered list of text fields with
//! an explicit policy for non-string values.

use hearth_core::{Error, Result, SchemaError};
use serde::Serialize;
use serde_json::Value;

/// Fields read from the `internal_report` group, in aggregation order.
pub const INTERNAL_REPORT_FIELDS: [&str; 3] =
    ["aesthetic_style", "emotional_tone", "behavioral_habit"];

/// Fields read from the `style_tags` group, in aggregation order.
pub const STYLE_TAG_FIELDS: [&str; 6] = [
    "aesthetic_style",
    "material_texture",
    "lighting_mood",
    "room_typology",
    "emotional_imagery",
    "persona_cues",
];

/// Standalone archetype label key.
pub const HOME_ARCHETYPE: &str = "home_archetype";

/// Where in the profile document a field came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldGroup {
    InternalReport,
    StyleTags,
    HomeArchetype,
}

impl FieldGroup {
    pub fn key(&self) -> &'static str {
        match self {
            FieldGroup::InternalReport => "internal_report",
            FieldGroup::StyleTags => "style_tags",
            FieldGroup::HomeArchetype => HOME_ARCHETYPE,
        }
    }
}

/// One text field contributed by a profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileField {
    pub group: FieldGroup,
    pub key: &'static str,
    pub text: String,
}

/// A preference profile reduced to the fields that drive aggregation.
///
/// Fields are kept in a fixed priority order: the internal report group, then the
/// style tags group, then the archetype label. Groups are additive. A key that is
/// absent (or `null`) contributes nothing; an empty string still counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PreferenceProfile {
    fields: Vec<ProfileField>,
}

impl PreferenceProfile {
    /// Extract fields from a profile document.
    ///
    /// Value policy: strings verbatim, numbers and booleans stringified, arrays of
    /// scalars joined with `", "`. Objects, nested arrays and non-object groups are
    /// rejected with [`SchemaError::MalformedProfile`].
    pub fn from_value(doc: &Value) -> Result<Self> {
        let root = doc.as_object().ok_or_else(|| malformed("$", "profile must be a JSON object"))?;
        let mut fields = Vec::new();

        for (group, keys) in [
            (FieldGroup::InternalReport, &INTERNAL_REPORT_FIELDS[..]),
            (FieldGroup::StyleTags, &STYLE_TAG_FIELDS[..]),
        ] {
            let section = match root.get(group.key()) {
                None | Some(Value::Null) => continue,
                Some(Value::Object(map)) => map,
                Some(_) => return Err(malformed(group.key(), "expected an object")),
            };
            for &key in keys {
                let path = format!("{}.{}", group.key(), key);
                let text = section.get(key).map(|v| field_text(&path, v)).transpose()?.flatten();
                if let Some(text) = text {
                    fields.push(ProfileField { group, key, text });
                }
            }
        }

        if let Some(text) = root
            .get(HOME_ARCHETYPE)
            .map(|v| field_text(HOME_ARCHETYPE, v))
            .transpose()?
            .flatten()
        {
            fields.push(ProfileField {
                group: FieldGroup::HomeArchetype,
                key: HOME_ARCHETYPE,
                text,
            });
        }

        Ok(Self { fields })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(json)?;
        Self::from_value(&doc)
    }

    pub fn fields(&self) -> &[ProfileField] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The field texts in aggregation order.
    pub fn texts(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.text.clone()).collect()
    }
}

impl TryFrom<&Value> for PreferenceProfile {
    type Error = Error;

    fn try_from(doc: &Value) -> Result<Self> {
        Self::from_value(doc)
    }
}

/// Ordered field strings of a profile. See [`PreferenceProfile`] for the ordering.
pub fn extract_fields(profile: &PreferenceProfile) -> Vec<String> {
    profile.texts()
}

/// `Ok(None)` means the value is treated as absent.
fn field_text(path: &str, value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => {
            let parts = items
                .iter()
                .map(|item| {
                    scalar_text(item).ok_or_else(|| malformed(path, "array items must be scalars"))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Some(parts.join(", ")))
        }
        Value::Object(_) => Err(malformed(path, "expected text, found an object")),
        scalar => Ok(scalar_text(scalar)),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn malformed(field: &str, reason: &str) -> Error {
    SchemaError::MalformedProfile {
        field: field.to_string(),
        reason: reason.to_string(),
    }
    .into()
}
