//! Benchmarks for the panning laws.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_autopan::dsp::PanningLaw;

use crate::BLOCK_SIZES;

pub fn bench_panning(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/panning");

    for &size in BLOCK_SIZES {
        let positions: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        for law in PanningLaw::ALL {
            let name = format!("{:?}", law).to_lowercase();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for ((l, r), &pan) in left.iter_mut().zip(right.iter_mut()).zip(&positions) {
                        (*l, *r) = law.apply(black_box(pan));
                    }
                })
            });
        }
    }

    group.finish();
}
