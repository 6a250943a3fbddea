//! Benchmarks for the modulation primitives and the full processor.
//!
//! Run with: cargo bench
//!
//! Everything here runs inside the audio callback, once per sample, so it
//! has to stay well within real-time deadlines.
//!
//! Reference timing at 48kHz sample rate:
//!   - 64 samples  = 1.33ms deadline
//!   - 128 samples = 2.67ms deadline
//!   - 256 samples = 5.33ms deadline
//!   - 512 samples = 10.67ms deadline
//!
//! Benchmark groups:
//!   - dsp/*        Primitives (gain, LFO, panning laws, ramps)
//!   - scenarios/*  The processor with LFOs idle, running, and host-synced

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

pub const SAMPLE_RATE: f32 = 48_000.0;

criterion_group!(
    benches,
    // Primitives
    dsp::bench_amplify,
    dsp::bench_lfo,
    dsp::bench_panning,
    dsp::bench_smoothing,
    // Full processor
    scenarios::bench_processor,
);
criterion_main!(benches);
