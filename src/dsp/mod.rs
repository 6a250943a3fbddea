//! Low-level DSP primitives used by the modulation pipeline.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! call from inside the audio callback. They stay focused on the math; the
//! engine layers parameter handling and transport on top.

/// Gain helpers and decibel conversion.
pub mod amplify;
/// Perceptual control curves.
pub mod curve;
/// Low frequency oscillator with free and tempo-synced modes.
pub mod lfo;
/// LFO-to-gain and LFO-to-pan mapping.
pub mod modulate;
/// Scalar pan position to channel coefficients.
pub mod panning;
/// Post-process NaN / Inf / range guard.
pub mod safety;
/// Linear parameter ramps.
pub mod smoothing;

pub use curve::Curve;
pub use lfo::{Oscillator, SyncPolicy, Waveform};
pub use panning::PanningLaw;
pub use smoothing::SmoothedRamp;
