//! Preset interchange format.
//!
//! ```json
//! {
//!   "plugin": "saavy-autopan",
//!   "version": "0.1.0",
//!   "name": "Slow Sweep",
//!   "author": "someone",
//!   "modified": "2024-05-01T12:00:00Z",
//!   "presetFormat": 1,
//!   "parameters": { "gain": "70%", "panLFORate": "3/4", "boost": 0.25 }
//! }
//! ```
//!
//! Each parameter value is either display text (what a user would type in,
//! parsed with [`crate::params::format`]) or a raw normalized number. Files in
//! the wild use both, so [`load`] decides per field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::params::{format, ParameterStore};

/// Current version of the preset layout.
pub const PRESET_FORMAT: u32 = 1;

/// Value of the `plugin` field written by [`save`].
pub const PLUGIN_NAME: &str = "saavy-autopan";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    #[serde(default)]
    pub plugin: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub modified: String,
    #[serde(default = "default_format")]
    pub preset_format: u32,
    pub parameters: BTreeMap<String, PresetValue>,
}

fn default_format() -> u32 {
    PRESET_FORMAT
}

/// A stored parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PresetValue {
    /// Normalized 0..1 value.
    Number(f32),
    /// Display text, e.g. `"-6.0dB"` or `"3/4"`.
    Text(String),
}

/// How [`save`] writes parameter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueEncoding {
    /// Human-editable display text. Lossy to display precision.
    #[default]
    Text,
    /// Raw normalized floats. Exact.
    Normalized,
}

/// Descriptive fields for a saved preset.
#[derive(Debug, Clone, Default)]
pub struct PresetInfo {
    pub name: String,
    pub author: String,
    /// Timestamp text, supplied by the caller.
    pub modified: String,
}

/// Capture every parameter in the store.
pub fn capture(store: &ParameterStore, info: &PresetInfo, encoding: ValueEncoding) -> Preset {
    let parameters = store
        .schema()
        .iter()
        .enumerate()
        .map(|(index, def)| {
            let value = match encoding {
                ValueEncoding::Text => PresetValue::Text(format::display(def, store.get(index))),
                ValueEncoding::Normalized => PresetValue::Number(store.get_normalized(index)),
            };
            (def.id.clone(), value)
        })
        .collect();

    Preset {
        plugin: PLUGIN_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        name: info.name.clone(),
        author: info.author.clone(),
        modified: info.modified.clone(),
        preset_format: PRESET_FORMAT,
        parameters,
    }
}

/// Serialize the store to preset JSON.
pub fn save(store: &ParameterStore, info: &PresetInfo, encoding: ValueEncoding) -> Result<String, PresetError> {
    serde_json::to_string_pretty(&capture(store, info, encoding)).map_err(PresetError::Json)
}

pub fn parse(json: &str) -> Result<Preset, PresetError> {
    let preset: Preset = serde_json::from_str(json).map_err(PresetError::Json)?;
    if preset.preset_format > PRESET_FORMAT {
        return Err(PresetError::UnsupportedFormat {
            found: preset.preset_format,
        });
    }
    Ok(preset)
}

/// Write a parsed preset into the store. Returns how many values were applied.
///
/// Every field is resolved before the first write. Fields that resolve are
/// then written; unknown ids and unreadable text are skipped with a warning,
/// so a preset may be applied only in part.
pub fn apply(store: &ParameterStore, preset: &Preset) -> usize {
    let schema = store.schema();

    let resolved: Vec<(usize, f32)> = preset
        .parameters
        .iter()
        .filter_map(|(id, value)| {
            let Some(index) = schema.index_of_id(id) else {
                tracing::warn!(id = %id, preset = %preset.name, "unknown parameter in preset, skipped");
                return None;
            };
            let def = schema.get(index)?;

            let plain = match value {
                PresetValue::Number(normalized) => Some(def.denormalize(*normalized)),
                PresetValue::Text(text) => format::parse(def, text),
            };

            if plain.is_none() {
                tracing::warn!(id = %id, value = ?value, "unreadable preset value, skipped");
            }
            plain.map(|plain| (index, plain))
        })
        .collect();

    for &(index, plain) in &resolved {
        store.set(index, plain);
    }

    tracing::info!(name = %preset.name, applied = resolved.len(), "preset loaded");
    resolved.len()
}

/// Parse and apply preset JSON. Returns the preset name.
///
/// Malformed JSON leaves every value untouched. After a successful load the
/// audio thread should be told to reseed its ramps.
pub fn load(store: &ParameterStore, json: &str) -> Result<String, PresetError> {
    let preset = parse(json)?;
    apply(store, &preset);
    Ok(preset.name)
}

/// Restore every parameter to its default.
pub fn init(store: &ParameterStore) {
    store.reset_to_defaults();
    tracing::info!("parameters reset to defaults");
}

#[derive(Debug)]
pub enum PresetError {
    /// Not JSON, or not shaped like a preset
    Json(serde_json::Error),
    /// Written by a newer layout than this build understands
    UnsupportedFormat { found: u32 },
}

impl std::fmt::Display for PresetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresetError::Json(err) => write!(f, "Preset is not valid: {}", err),
            PresetError::UnsupportedFormat { found } => write!(
                f,
                "Preset format {} is newer than the supported format {}",
                found, PRESET_FORMAT
            ),
        }
    }
}

impl std::error::Error for PresetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PresetError::Json(err) => Some(err),
            PresetError::UnsupportedFormat { .. } => None,
        }
    }
}
