//! Parameter definitions, parsed once at startup.
//!
//! The schema is plain data: it is built by [`ParameterSchema::from_json`]
//! (or [`ParameterSchema::embedded`] for the built-in definitions), handed to
//! the store and the processor, and never mutated afterwards. Every
//! inconsistency is reported here as a [`SchemaError`] so nothing downstream
//! ever has to guess.

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

const EMBEDDED_SCHEMA: &str = include_str!("parameters.json");

/// How a continuous value is shown to (and typed in by) the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayFormat {
    Percent,
    Decibels,
    Pan,
    LfoRate,
    Hertz,
    Plain,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamKind {
    Continuous {
        min: f32,
        max: f32,
        default: f32,
        format: DisplayFormat,
    },
    Choice {
        choices: Vec<String>,
        default: usize,
    },
}

/// One validated parameter definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDef {
    /// Logical name used by code to resolve handles.
    pub key: String,
    /// Stable id written to presets and host automation.
    pub id: String,
    pub version: u32,
    pub name: String,
    pub kind: ParamKind,
}

impl ParamDef {
    /// Default as a plain value (choice defaults are the index).
    pub fn default_value(&self) -> f32 {
        match &self.kind {
            ParamKind::Continuous { default, .. } => *default,
            ParamKind::Choice { default, .. } => *default as f32,
        }
    }

    /// Plain value range (choices span `0..=len-1`).
    pub fn range(&self) -> (f32, f32) {
        match &self.kind {
            ParamKind::Continuous { min, max, .. } => (*min, *max),
            ParamKind::Choice { choices, .. } => (0.0, choices.len().saturating_sub(1) as f32),
        }
    }

    /// Clamp, and snap choices to a whole index.
    pub fn constrain(&self, value: f32) -> f32 {
        let (min, max) = self.range();
        let value = if value.is_finite() {
            value
        } else {
            self.default_value()
        };

        match self.kind {
            ParamKind::Continuous { .. } => value.clamp(min, max),
            ParamKind::Choice { .. } => value.round().clamp(min, max),
        }
    }

    pub fn normalize(&self, value: f32) -> f32 {
        let (min, max) = self.range();
        if max > min {
            ((self.constrain(value) - min) / (max - min)).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn denormalize(&self, normalized: f32) -> f32 {
        let (min, max) = self.range();
        self.constrain(min + normalized.clamp(0.0, 1.0) * (max - min))
    }

    pub fn is_choice(&self) -> bool {
        matches!(self.kind, ParamKind::Choice { .. })
    }
}

#[derive(Debug, Deserialize)]
struct RawParam {
    id: String,
    version: u32,
    name: Option<String>,
    min: Option<f32>,
    max: Option<f32>,
    default: Option<f32>,
    format: Option<DisplayFormat>,
    choices: Option<Vec<String>>,
}

/// Immutable set of parameter definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSchema {
    params: Vec<ParamDef>,
}

impl ParameterSchema {
    /// The definitions shipped with the crate.
    pub fn embedded() -> Result<Self, SchemaError> {
        Self::from_json(EMBEDDED_SCHEMA)
    }

    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let raw: BTreeMap<String, RawParam> = serde_json::from_str(json).map_err(SchemaError::Json)?;

        let mut seen = HashSet::new();
        let mut params = Vec::with_capacity(raw.len());

        for (key, raw) in raw {
            if !seen.insert(raw.id.clone()) {
                return Err(SchemaError::DuplicateId { id: raw.id });
            }
            params.push(validate(key, raw)?);
        }

        tracing::debug!(count = params.len(), "parameter schema loaded");
        Ok(Self { params })
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParamDef> {
        self.params.iter()
    }

    pub fn get(&self, index: usize) -> Option<&ParamDef> {
        self.params.get(index)
    }

    /// Index by logical key.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.params.iter().position(|p| p.key == key)
    }

    /// Index by stable id (as written in presets).
    pub fn index_of_id(&self, id: &str) -> Option<usize> {
        self.params.iter().position(|p| p.id == id)
    }

    /// Look up a key and require a given kind.
    pub(crate) fn require(&self, key: &str, choice: bool) -> Result<usize, SchemaError> {
        let index = self.index_of(key).ok_or_else(|| SchemaError::Missing {
            key: key.to_string(),
        })?;

        if self.params[index].is_choice() != choice {
            return Err(SchemaError::KindMismatch {
                key: key.to_string(),
                expected: if choice { "choice" } else { "continuous" },
            });
        }

        Ok(index)
    }
}

fn validate(key: String, raw: RawParam) -> Result<ParamDef, SchemaError> {
    let name = raw.name.unwrap_or_else(|| key.clone());

    let kind = match (raw.choices, raw.min, raw.max) {
        (Some(choices), None, None) => {
            let default = raw.default.unwrap_or(0.0);
            let valid = !choices.is_empty()
                && default >= 0.0
                && default.fract() == 0.0
                && (default as usize) < choices.len();
            if !valid {
                return Err(SchemaError::InvalidChoices { key });
            }
            ParamKind::Choice {
                choices,
                default: default as usize,
            }
        }
        (None, Some(min), Some(max)) => {
            let default = raw.default.unwrap_or(min);
            let valid = min.is_finite()
                && max.is_finite()
                && min < max
                && (min..=max).contains(&default);
            if !valid {
                return Err(SchemaError::InvalidRange { key });
            }
            ParamKind::Continuous {
                min,
                max,
                default,
                format: raw.format.unwrap_or(DisplayFormat::Plain),
            }
        }
        _ => return Err(SchemaError::Malformed { key }),
    };

    Ok(ParamDef {
        key,
        id: raw.id,
        version: raw.version,
        name,
        kind,
    })
}

/// Errors raised while building a schema or resolving handles against it.
#[derive(Debug)]
pub enum SchemaError {
    /// The schema text is not valid JSON of the expected shape
    Json(serde_json::Error),
    /// An entry is neither continuous (min/max) nor a choice list
    Malformed { key: String },
    /// Continuous range is empty, non-finite, or excludes the default
    InvalidRange { key: String },
    /// Choice list is empty or the default index is out of bounds
    InvalidChoices { key: String },
    /// Two entries share a stable id
    DuplicateId { id: String },
    /// Code asked for a parameter the schema does not define
    Missing { key: String },
    /// Code asked for a choice where the schema has a continuous value, or vice versa
    KindMismatch { key: String, expected: &'static str },
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaError::Json(err) => write!(f, "Parameter schema is not valid: {}", err),
            SchemaError::Malformed { key } => {
                write!(f, "Parameter '{}' needs either min/max or choices", key)
            }
            SchemaError::InvalidRange { key } => {
                write!(f, "Parameter '{}' has an invalid range or default", key)
            }
            SchemaError::InvalidChoices { key } => {
                write!(f, "Parameter '{}' has no choices or a bad default index", key)
            }
            SchemaError::DuplicateId { id } => write!(f, "Parameter id '{}' is used twice", id),
            SchemaError::Missing { key } => write!(f, "Parameter '{}' is not in the schema", key),
            SchemaError::KindMismatch { key, expected } => {
                write!(f, "Parameter '{}' is not a {} parameter", key, expected)
            }
        }
    }
}

impl std::error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SchemaError::Json(err) => Some(err),
            _ => None,
        }
    }
}
