pub mod dsp; // Realtime-safe primitives
pub mod engine; // Ramps, LFOs and transport tied together per sample
pub mod message;
pub mod params; // Schema, atomic store, typed handles
pub mod preset;
pub mod transport; // Host tempo and position

pub use engine::{BlockReport, ModulationConfig, Processor, StereoInput};
pub use params::{ParameterSchema, ParameterStore};

/// Largest number of samples rendered in one pass; longer host buffers are chunked.
pub const MAX_BLOCK_SIZE: usize = 2048;

/// Tempo used when the host reports none.
pub const DEFAULT_BPM: f64 = 120.0;

/// Parameter ramp length in seconds.
pub const RAMP_SECONDS: f32 = 0.02;
