//! The modulation engine: ramps, LFOs and transport tied together per sample.
//!
//! [`Processor`] is what a host drives. It owns a [`ModulationPipeline`],
//! which owns the [`SmoothingBank`](bank::SmoothingBank) and both LFOs.

pub mod bank;
pub mod pipeline;
pub mod processor;

pub use bank::{SmoothedValues, SmoothingBank};
pub use pipeline::{Coefficients, ModulationConfig, ModulationPipeline, PositionInterpolation};
pub use processor::{BlockReport, Processor, StereoInput, DEFAULT_SAMPLE_RATE};
