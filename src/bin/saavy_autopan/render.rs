//! `render` subcommand: offline processing into a stereo float WAV.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use saavy_autopan::dsp::amplify::{apply_gain, decibels_to_gain, gain_to_decibels};
use saavy_autopan::dsp::lfo::SyncPolicy;
use saavy_autopan::engine::PositionInterpolation;
use saavy_autopan::transport::{HostPosition, TimeSignature};
use saavy_autopan::{preset, ModulationConfig, ParameterStore, Processor, StereoInput};

#[derive(Args)]
pub struct RenderOptions {
    /// Output file path
    #[arg(short, long, default_value = "autopan.wav")]
    output: PathBuf,

    /// Input WAV (mono or stereo); a sine tone is rendered when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Preset JSON applied before rendering
    #[arg(short, long)]
    preset: Option<PathBuf>,

    /// Parameter overrides as id=text, applied after the preset
    #[arg(long = "set", value_name = "ID=TEXT")]
    overrides: Vec<String>,

    /// Tone duration in seconds
    #[arg(short, long, default_value = "4.0")]
    duration: f32,

    /// Tone sample rate in Hz (input files keep their own)
    #[arg(short, long, default_value = "48000")]
    sample_rate: u32,

    /// Tone frequency in Hz
    #[arg(long, default_value = "220.0")]
    tone_hz: f32,

    /// Tone level in dB
    #[arg(long, default_value = "-12.0")]
    level: f32,

    /// Simulated host tempo
    #[arg(short, long, default_value = "120.0")]
    bpm: f64,

    /// Simulated host meter, e.g. 3/4
    #[arg(long, default_value = "4/4")]
    meter: String,

    /// Simulated host buffer size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Report no playhead, so synced LFOs follow the internal clock
    #[arg(long)]
    stopped: bool,

    /// Only re-anchor synced LFOs when a cycle boundary is crossed
    #[arg(long)]
    retrigger: bool,

    /// Sync LFOs once per block instead of per sample
    #[arg(long)]
    per_block: bool,
}

pub fn run(store: Arc<ParameterStore>, options: &RenderOptions) -> EyreResult<()> {
    if let Some(path) = &options.preset {
        let json = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        let name = preset::load(&store, &json)
            .wrap_err_with(|| format!("failed to load {}", path.display()))?;
        tracing::info!(%name, "preset applied");
    }
    crate::apply_overrides(&store, &options.overrides)?;

    let (channels, sample_rate) = match &options.input {
        Some(path) => read_wav(path)?,
        None => (vec![tone(options)], options.sample_rate),
    };

    let config = ModulationConfig {
        sync_policy: if options.retrigger {
            SyncPolicy::CycleRetrigger
        } else {
            SyncPolicy::Continuous
        },
        interpolation: if options.per_block {
            PositionInterpolation::PerBlock
        } else {
            PositionInterpolation::PerSample
        },
        default_bpm: options.bpm,
        ..Default::default()
    };

    let block_size = options.block_size.max(1);
    let mut processor = Processor::new(Arc::clone(&store), config).wrap_err("parameter schema mismatch")?;
    processor.prepare(sample_rate as f32, block_size);

    let len = channels.first().map_or(0, Vec::len);
    let mut left = vec![0.0; len];
    let mut right = vec![0.0; len];

    let meter = parse_meter(&options.meter)?;
    let beats_per_sample = options.bpm / 60.0 / f64::from(sample_rate);
    let mut cleared_blocks = 0;

    for start in (0..len).step_by(block_size) {
        let end = (start + block_size).min(len);
        let input = match channels.as_slice() {
            [mono] => StereoInput::Mono(&mono[start..end]),
            [l, r, ..] => StereoInput::Stereo(&l[start..end], &r[start..end]),
            [] => break,
        };

        let host = HostPosition {
            bpm: Some(options.bpm),
            ppq_position: (!options.stopped).then(|| start as f64 * beats_per_sample),
            time_signature: Some(meter),
            is_playing: !options.stopped,
        };

        let report = processor.process(input, &mut left[start..end], &mut right[start..end], Some(&host));
        if report.fault.is_some() {
            cleared_blocks += 1;
        }
    }

    write_wav(&options.output, &left, &right, sample_rate)?;

    println!("=== saavy-autopan ===");
    println!("Samples: {}", len);
    println!("Sample rate: {} Hz", sample_rate);
    println!(
        "Tempo: {} BPM, {}/{} ({} beats per bar)",
        options.bpm,
        meter.numerator,
        meter.denominator,
        meter.quarter_beats_per_bar()
    );
    let peak = left.iter().chain(&right).fold(0.0f32, |peak, s| peak.max(s.abs()));
    println!("Peak: {:.1} dBFS", gain_to_decibels(peak));
    println!("Cleared blocks: {}", cleared_blocks);
    println!("Wrote {}", options.output.display());
    Ok(())
}

fn tone(options: &RenderOptions) -> Vec<f32> {
    let sample_rate = options.sample_rate as f32;
    let len = (options.duration.max(0.0) * sample_rate) as usize;
    let step = std::f32::consts::TAU * options.tone_hz / sample_rate;

    let mut signal: Vec<f32> = (0..len).map(|n| (n as f32 * step).sin()).collect();
    apply_gain(&mut signal, decibels_to_gain(options.level));
    signal
}

fn parse_meter(text: &str) -> EyreResult<TimeSignature> {
    let (numerator, denominator) = text
        .split_once('/')
        .ok_or_else(|| eyre!("meter '{}' is not in n/d form", text))?;
    let meter = TimeSignature::new(
        numerator.trim().parse().wrap_err("invalid meter numerator")?,
        denominator.trim().parse().wrap_err("invalid meter denominator")?,
    );

    if !meter.is_valid() {
        return Err(eyre!("meter '{}' is not valid", text));
    }
    Ok(meter)
}

/// De-interleave a WAV file into per-channel f32 buffers.
fn read_wav(path: &Path) -> EyreResult<(Vec<Vec<f32>>, u32)> {
    let mut reader =
        WavReader::open(path).wrap_err_with(|| format!("failed to open {}", path.display()))?;
    let spec = reader.spec();
    let channel_count = usize::from(spec.channels);

    if !(1..=2).contains(&channel_count) {
        return Err(eyre!("{} has {} channels, expected 1 or 2", path.display(), channel_count));
    }

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .wrap_err("failed to decode samples")?,
        SampleFormat::Int => {
            let scale = 1.0 / (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|s| s as f32 * scale))
                .collect::<Result<_, _>>()
                .wrap_err("failed to decode samples")?
        }
    };

    let mut channels = vec![Vec::with_capacity(samples.len() / channel_count); channel_count];
    for frame in samples.chunks_exact(channel_count) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    tracing::info!(path = %path.display(), channels = channel_count, sample_rate = spec.sample_rate, "input loaded");
    Ok((channels, spec.sample_rate))
}

fn write_wav(path: &Path, left: &[f32], right: &[f32], sample_rate: u32) -> EyreResult<()> {
    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec).wrap_err("failed to create WAV file")?;
    for (&l, &r) in left.iter().zip(right) {
        writer.write_sample(l).wrap_err("failed to write sample")?;
        writer.write_sample(r).wrap_err("failed to write sample")?;
    }
    writer.finalize().wrap_err("failed to finalize WAV file")?;
    Ok(())
}
