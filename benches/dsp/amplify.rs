//! Benchmarks for gain primitives.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_autopan::dsp::amplify;

use crate::BLOCK_SIZES;

pub fn bench_amplify(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/amplify");

    for &size in BLOCK_SIZES {
        let signal: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();
        let modulator: Vec<f32> = (0..size).map(|i| i as f32 / size as f32).collect();

        let mut signal_copy = signal.clone();
        group.bench_with_input(
            BenchmarkId::new("multiply_in_place", size),
            &size,
            |b, _| {
                b.iter(|| {
                    signal_copy.copy_from_slice(&signal);
                    amplify::multiply_in_place(black_box(&mut signal_copy), black_box(&modulator))
                })
            },
        );

        let decibels: Vec<f32> = (0..size).map(|i| 12.0 * i as f32 / size as f32).collect();
        let mut gains = vec![0.0f32; size];
        group.bench_with_input(BenchmarkId::new("decibels_to_gain", size), &size, |b, _| {
            b.iter(|| {
                for (gain, &db) in gains.iter_mut().zip(&decibels) {
                    *gain = amplify::decibels_to_gain(black_box(db));
                }
            })
        });
    }

    group.finish();
}
