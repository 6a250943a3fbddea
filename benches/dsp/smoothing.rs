//! Benchmarks for parameter ramps.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_autopan::dsp::SmoothedRamp;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_smoothing(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/smoothing");

    for &size in BLOCK_SIZES {
        let mut output = vec![0.0f32; size];
        let mut ramp = SmoothedRamp::new(0.0);
        ramp.reset(SAMPLE_RATE, 0.02);
        let mut target = 1.0;

        // Retargeted every block, so the ramp is always moving
        group.bench_with_input(BenchmarkId::new("ramping", size), &size, |b, _| {
            b.iter(|| {
                target = 1.0 - target;
                ramp.set_target(target);
                for sample in output.iter_mut() {
                    *sample = ramp.next();
                }
                black_box(&output);
            })
        });
    }

    group.finish();
}
