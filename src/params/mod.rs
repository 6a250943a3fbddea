//! Parameter schema, lock-free value store and typed handles.

pub mod format;
pub mod handles;
pub mod schema;
pub mod store;

pub use handles::{AutopanParams, LfoParams, LfoSync};
pub use schema::{DisplayFormat, ParamDef, ParamKind, ParameterSchema, SchemaError};
pub use store::{Choice, ChoiceParam, FloatParam, ParameterStore};
