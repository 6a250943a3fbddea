//! Benchmarks for low-level DSP primitives.

mod amplify;
mod lfo;
mod panning;
mod smoothing;

pub use amplify::bench_amplify;
pub use lfo::bench_lfo;
pub use panning::bench_panning;
pub use smoothing::bench_smoothing;
