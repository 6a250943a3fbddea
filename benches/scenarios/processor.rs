//! Benchmarks for the processor under typical settings.
//!
//! Scenarios:
//!   - static:      LFOs at zero amount, only ramps and panning
//!   - tremolo_pan: both LFOs running free
//!   - host_synced: both LFOs synced, re-anchored per sample to a playing host

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion};
use saavy_autopan::params::AutopanParams;
use saavy_autopan::transport::HostPosition;
use saavy_autopan::{ModulationConfig, ParameterSchema, ParameterStore, Processor, StereoInput};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn processor(block_size: usize, configure: impl Fn(&ParameterStore, &AutopanParams)) -> Processor {
    let schema = ParameterSchema::embedded().expect("embedded schema");
    let store = Arc::new(ParameterStore::new(Arc::new(schema)));
    let params = AutopanParams::resolve(&store).expect("schema handles");
    configure(&store, &params);

    let mut processor = Processor::new(store, ModulationConfig::default()).expect("processor");
    processor.prepare(SAMPLE_RATE, block_size);
    processor
}

pub fn bench_processor(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/processor");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin() * 0.5).collect();
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        let mut idle = processor(size, |store, params| {
            params.gain.set(store, 0.8);
            params.pan.set(store, -0.3);
        });
        group.bench_with_input(BenchmarkId::new("static", size), &size, |b, _| {
            b.iter(|| {
                idle.process(StereoInput::Mono(black_box(&input)), &mut left, &mut right, None)
            })
        });

        let mut free = processor(size, |store, params| {
            params.gain_lfo.sync.select(store, 0);
            params.gain_lfo.amount.set(store, 0.7);
            params.pan_lfo.sync.select(store, 0);
            params.pan_lfo.amount.set(store, 1.0);
        });
        group.bench_with_input(BenchmarkId::new("tremolo_pan", size), &size, |b, _| {
            b.iter(|| {
                free.process(StereoInput::Mono(black_box(&input)), &mut left, &mut right, None)
            })
        });

        let mut synced = processor(size, |store, params| {
            params.gain_lfo.amount.set(store, 0.5);
            params.pan_lfo.amount.set(store, 1.0);
            params.pan_lfo.rate.set(store, 0.125);
        });
        let mut host = HostPosition {
            bpm: Some(128.0),
            ppq_position: Some(0.0),
            time_signature: None,
            is_playing: true,
        };
        let beats_per_block = size as f64 * 128.0 / 60.0 / f64::from(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("host_synced", size), &size, |b, _| {
            b.iter(|| {
                let report = synced.process(
                    StereoInput::Stereo(black_box(&input), black_box(&input)),
                    &mut left,
                    &mut right,
                    Some(&host),
                );
                host.ppq_position = host.ppq_position.map(|ppq| ppq + beats_per_block);
                report
            })
        });
    }

    group.finish();
}
