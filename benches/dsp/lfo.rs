//! Benchmarks for the LFO in free and host-synced modes.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_autopan::dsp::{Oscillator, Waveform};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_lfo(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/lfo");

    for &size in BLOCK_SIZES {
        let mut output = vec![0.0f32; size];

        for waveform in [Waveform::Sine, Waveform::Triangle, Waveform::Square, Waveform::Saw] {
            let mut lfo = Oscillator::new();
            lfo.prepare(SAMPLE_RATE);
            lfo.set_waveform(waveform);
            lfo.set_free_rate_hz(2.0);

            let name = format!("free_{:?}", waveform).to_lowercase();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for sample in output.iter_mut() {
                        *sample = lfo.sample();
                    }
                    black_box(&output);
                })
            });
        }

        // Re-anchored to the host position on every sample
        let mut lfo = Oscillator::new();
        lfo.prepare(SAMPLE_RATE);
        lfo.set_bpm(128.0);
        lfo.set_synced_note(0.25, None);
        let beats_per_sample = 128.0 / 60.0 / f64::from(SAMPLE_RATE);
        let mut position = 0.0;

        group.bench_with_input(BenchmarkId::new("synced_per_sample", size), &size, |b, _| {
            b.iter(|| {
                for sample in output.iter_mut() {
                    lfo.sync_to_host_position(black_box(position));
                    *sample = lfo.sample();
                    position += beats_per_sample;
                }
                black_box(&output);
            })
        });
    }

    group.finish();
}
