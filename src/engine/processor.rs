use std::sync::Arc;

use crate::dsp::amplify::multiply_in_place;
use crate::dsp::safety::{check_audio_safety, SafetyFault};
use crate::message::{ControlMessage, MessageReceiver, NoMessages};
use crate::params::{ParameterStore, SchemaError};
use crate::transport::{HostPosition, HostTransport, TransportSnapshot};
use crate::MAX_BLOCK_SIZE;

use super::pipeline::{ModulationConfig, ModulationPipeline};

/// Sample rate assumed until [`Processor::prepare`] is called.
pub const DEFAULT_SAMPLE_RATE: f32 = 44_100.0;

/// Input channel layout for one call to [`Processor::process`].
#[derive(Debug, Clone, Copy)]
pub enum StereoInput<'a> {
    Stereo(&'a [f32], &'a [f32]),
    /// A single channel, fed to both sides before panning.
    Mono(&'a [f32]),
}

impl StereoInput<'_> {
    pub fn len(&self) -> usize {
        match self {
            StereoInput::Stereo(left, right) => left.len().min(right.len()),
            StereoInput::Mono(mono) => mono.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What happened during one processed buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockReport {
    pub samples: usize,
    /// Set when the output was cleared by the safety check.
    pub fault: Option<SafetyFault>,
    /// Transport view of the last chunk.
    pub transport: TransportSnapshot,
}

/// The audio-thread side of the engine.
///
/// Reads parameters from a shared [`ParameterStore`], drains control
/// messages, and renders `out = in × gain × boost × pan` per channel.
/// All buffers are allocated up front; `process` never allocates.
pub struct Processor<R: MessageReceiver = NoMessages> {
    store: Arc<ParameterStore>,
    pipeline: ModulationPipeline,
    rx: R,
    left_gain: Vec<f32>,
    right_gain: Vec<f32>,
    sample_rate: f32,
    faulted: bool,
}

impl Processor<NoMessages> {
    pub fn new(store: Arc<ParameterStore>, config: ModulationConfig) -> Result<Self, SchemaError> {
        Self::with_receiver(store, config, NoMessages)
    }
}

impl<R: MessageReceiver> Processor<R> {
    pub fn with_receiver(
        store: Arc<ParameterStore>,
        config: ModulationConfig,
        rx: R,
    ) -> Result<Self, SchemaError> {
        let mut pipeline = ModulationPipeline::new(&store, config)?;
        pipeline.prepare(DEFAULT_SAMPLE_RATE, &store);

        Ok(Self {
            store,
            pipeline,
            rx,
            left_gain: vec![0.0; MAX_BLOCK_SIZE],
            right_gain: vec![0.0; MAX_BLOCK_SIZE],
            sample_rate: DEFAULT_SAMPLE_RATE,
            faulted: false,
        })
    }

    pub fn store(&self) -> &Arc<ParameterStore> {
        &self.store
    }

    pub fn pipeline(&self) -> &ModulationPipeline {
        &self.pipeline
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Set up for a sample rate and maximum host buffer size.
    ///
    /// Call from the control thread before audio starts; this may allocate.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize) {
        let chunk = max_block_size.clamp(1, MAX_BLOCK_SIZE);
        self.left_gain.resize(chunk, 0.0);
        self.right_gain.resize(chunk, 0.0);

        self.sample_rate = sample_rate;
        self.faulted = false;
        self.pipeline.prepare(sample_rate, &self.store);

        tracing::info!(sample_rate, max_block_size, chunk, "processor prepared");
    }

    /// Render one host buffer. Outputs shorter than the input truncate it.
    pub fn process(
        &mut self,
        input: StereoInput<'_>,
        out_l: &mut [f32],
        out_r: &mut [f32],
        host: Option<&dyn HostTransport>,
    ) -> BlockReport {
        let len = input.len().min(out_l.len()).min(out_r.len());
        let (out_l, out_r) = (&mut out_l[..len], &mut out_r[..len]);

        match input {
            StereoInput::Stereo(in_l, in_r) => {
                out_l.copy_from_slice(&in_l[..len]);
                out_r.copy_from_slice(&in_r[..len]);
            }
            StereoInput::Mono(mono) => {
                out_l.copy_from_slice(&mono[..len]);
                out_r.copy_from_slice(&mono[..len]);
            }
        }

        self.process_in_place(out_l, out_r, host)
    }

    /// Render a stereo buffer in place.
    pub fn process_in_place(
        &mut self,
        left: &mut [f32],
        right: &mut [f32],
        host: Option<&dyn HostTransport>,
    ) -> BlockReport {
        self.drain_messages();

        let len = left.len().min(right.len());
        let chunk = self.left_gain.len();

        // Later chunks of one host buffer continue from where the previous
        // chunk ended instead of re-reading the buffer-start position.
        let mut host_info: Option<HostPosition> = host.and_then(|h| h.position());
        let mut transport = *self.pipeline.snapshot();
        let mut offset = 0;

        while offset < len {
            let n = (len - offset).min(chunk);
            let host_ref = host_info.as_ref().map(|info| info as &dyn HostTransport);
            transport = self.pipeline.begin_block(&self.store, host_ref, n);

            if let Some(info) = host_info.as_mut() {
                if transport.from_host {
                    info.ppq_position = Some(transport.position_at(n));
                }
            }

            let (left_gain, right_gain) = (&mut self.left_gain[..n], &mut self.right_gain[..n]);
            self.pipeline.render_coefficients(left_gain, right_gain);

            multiply_in_place(&mut left[offset..offset + n], left_gain);
            multiply_in_place(&mut right[offset..offset + n], right_gain);

            offset += n;
        }

        let fault = check_audio_safety(&mut [&mut left[..len], &mut right[..len]]);
        match fault {
            Some(fault) if !self.faulted => {
                tracing::warn!(?fault, samples = len, "unsafe output detected, buffer cleared");
                self.faulted = true;
            }
            None if self.faulted => {
                tracing::info!("output back within safe range");
                self.faulted = false;
            }
            _ => {}
        }

        BlockReport {
            samples: len,
            fault,
            transport,
        }
    }

    fn drain_messages(&mut self) {
        while let Some(message) = self.rx.pop() {
            match message {
                ControlMessage::Reseed => self.pipeline.reseed(&self.store),
                ControlMessage::Reset => self.pipeline.reset(&self.store),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{AutopanParams, ParameterSchema};

    fn processor() -> (Processor, AutopanParams) {
        let store = Arc::new(ParameterStore::new(Arc::new(
            ParameterSchema::embedded().unwrap(),
        )));
        let mut processor = Processor::new(store, ModulationConfig::default()).unwrap();
        processor.prepare(48_000.0, 512);
        let params = *processor.pipeline().params();
        (processor, params)
    }

    #[test]
    fn long_buffers_are_chunked() {
        let (mut processor, _) = processor();
        let input = vec![0.25; 1500];
        let mut left = vec![0.0; 1500];
        let mut right = vec![0.0; 1500];

        let report = processor.process(StereoInput::Mono(&input), &mut left, &mut right, None);

        assert_eq!(report.samples, 1500);
        assert!(left.iter().all(|&s| s > 0.0));
        assert!(right.iter().all(|&s| s > 0.0));
    }

    #[test]
    fn chunks_continue_host_position() {
        let (mut processor, _) = processor();
        let host = HostPosition {
            bpm: Some(120.0),
            ppq_position: Some(8.0),
            time_signature: None,
            is_playing: true,
        };
        let mut left = vec![0.0; 1024];
        let mut right = vec![0.0; 1024];

        let report = processor.process_in_place(&mut left, &mut right, Some(&host));

        // Second 512-sample chunk starts 512 samples past the host position
        let expected = 8.0 + 512.0 * 2.0 / 48_000.0;
        assert!((report.transport.position - expected).abs() < 1e-9);
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn reseed_message_snaps_ramps() {
        let store = Arc::new(ParameterStore::new(Arc::new(
            ParameterSchema::embedded().unwrap(),
        )));
        let (mut tx, rx) = crate::message::control_channel(4);
        let mut processor =
            Processor::with_receiver(Arc::clone(&store), ModulationConfig::default(), rx).unwrap();
        processor.prepare(48_000.0, 256);

        let params = *processor.pipeline().params();
        params.gain.set(&store, 0.5);
        params.panning_law.select(&store, 1); // triangle
        tx.push(ControlMessage::Reseed).unwrap();

        let input = [1.0; 8];
        let (mut left, mut right) = ([0.0; 8], [0.0; 8]);
        processor.process(StereoInput::Mono(&input), &mut left, &mut right, None);

        assert_eq!(left, [0.5; 8]);
        assert_eq!(right, [0.5; 8]);
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn reset_message_rewinds_clock_and_lfos() {
        let store = Arc::new(ParameterStore::new(Arc::new(
            ParameterSchema::embedded().unwrap(),
        )));
        let (mut tx, rx) = crate::message::control_channel(4);
        let mut processor =
            Processor::with_receiver(Arc::clone(&store), ModulationConfig::default(), rx).unwrap();
        processor.prepare(48_000.0, 256);

        let input = [1.0; 256];
        let (mut left, mut right) = ([0.0; 256], [0.0; 256]);
        for _ in 0..10 {
            processor.process(StereoInput::Mono(&input), &mut left, &mut right, None);
        }
        assert!(processor.pipeline().snapshot().position > 0.0);

        let params = *processor.pipeline().params();
        params.gain.set(&store, 0.5);
        params.panning_law.select(&store, 1); // triangle
        tx.push(ControlMessage::Reset).unwrap();

        let (mut left, mut right) = ([0.0; 8], [0.0; 8]);
        let report = processor.process(StereoInput::Mono(&input[..8]), &mut left, &mut right, None);

        assert_eq!(report.transport.position, 0.0);
        // 1/4 note at 120 bpm: eight samples into the first cycle
        let expected_phase = 8.0 * 2.0 / 48_000.0;
        assert!((processor.pipeline().gain_lfo().phase() - expected_phase).abs() < 1e-9);
        assert!((processor.pipeline().pan_lfo().phase() - expected_phase).abs() < 1e-9);
        assert_eq!(left, [0.5; 8]);
        assert_eq!(right, [0.5; 8]);
    }

    #[test]
    fn runaway_boost_is_caught() {
        let (mut processor, params) = processor();
        params.boost.set(processor.store(), 12.0);
        processor.pipeline.reseed(&processor.store);

        let input = [0.9; 64];
        let (mut left, mut right) = ([0.0; 64], [0.0; 64]);
        let report = processor.process(StereoInput::Mono(&input), &mut left, &mut right, None);

        assert_eq!(report.fault, Some(SafetyFault::OutOfRange));
        assert!(left.iter().chain(right.iter()).all(|&s| s == 0.0));
    }
}
