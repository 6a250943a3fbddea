//! Benchmarks for the complete processor.

mod processor;

pub use processor::bench_processor;
