use crate::dsp::amplify::decibels_to_gain;
use crate::dsp::modulate::{gain_factor, modulated_pan};
use crate::dsp::{Curve, Oscillator, PanningLaw, SyncPolicy};
use crate::params::{AutopanParams, LfoParams, LfoSync, ParameterStore, SchemaError};
use crate::transport::{HostTransport, TimeSignature, TransportSnapshot, TransportSync};

use super::bank::SmoothingBank;

/*
Modulation Pipeline
===================

Per block (once, before the sample loop):

    host ──▶ TransportSync ──▶ snapshot {bpm, position, meter, playing}
    store ──▶ SmoothingBank.set_targets
    store ──▶ curves, panning law, LFO shape / sync mode / rate
    snapshot.bpm ──▶ LFO increments

Per sample:

    ramps ──▶ gain, boost(dB), pan, lfo amounts
    gain  ──▶ curve ──────────────────────────┐
    boost ──▶ curve ──▶ dB → linear ──────────┤
    position(i) ──▶ LFO re-anchor ──▶ sample ─┼──▶ gain × tremolo factor
                                              └──▶ pan + lfo × amount × depth
    pan ──▶ panning law ──▶ (panL, panR)

The render loop then computes  out = in × gain × boost × pan{L,R}.

Everything a block needs is resolved before the loop: choice parameters
become plain enums, so the per-sample path never touches a string or the
parameter store.
*/

/// Where synced LFOs get their musical position from inside a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionInterpolation {
    /// Position advanced per sample from the block start. Sub-block accurate.
    #[default]
    PerSample,
    /// Re-anchor once at block start, then free-run on the synced increment.
    PerBlock,
}

/// Engine-wide behaviour switches. Not automatable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModulationConfig {
    pub sync_policy: SyncPolicy,
    pub phase_invert: bool,
    /// Scale synced note lengths by the host meter (numerator / denominator).
    pub honor_meter: bool,
    pub interpolation: PositionInterpolation,
    /// Pan excursion at full LFO amount.
    pub pan_lfo_depth: f32,
    pub ramp_seconds: f32,
    /// Tempo used when the host reports none.
    pub default_bpm: f64,
}

impl Default for ModulationConfig {
    fn default() -> Self {
        Self {
            sync_policy: SyncPolicy::Continuous,
            phase_invert: false,
            honor_meter: true,
            interpolation: PositionInterpolation::PerSample,
            pan_lfo_depth: 0.5,
            ramp_seconds: crate::RAMP_SECONDS,
            default_bpm: crate::DEFAULT_BPM,
        }
    }
}

/// Per-sample output of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    /// Linear gain after curve and tremolo.
    pub gain: f32,
    /// Linear boost factor.
    pub boost: f32,
    pub pan_l: f32,
    pub pan_r: f32,
}

impl Coefficients {
    #[inline]
    pub fn left(&self) -> f32 {
        self.gain * self.boost * self.pan_l
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.gain * self.boost * self.pan_r
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct BlockSettings {
    gain_curve: Curve,
    boost_curve: Curve,
    law: PanningLaw,
}

/// Turns parameter values and host transport into per-sample coefficients.
///
/// Owns its ramps and oscillators; reads the externally owned
/// [`ParameterStore`] once per block.
#[derive(Debug, Clone)]
pub struct ModulationPipeline {
    config: ModulationConfig,
    params: AutopanParams,
    gain_range: (f32, f32),
    boost_range: (f32, f32),
    bank: SmoothingBank,
    gain_lfo: Oscillator,
    pan_lfo: Oscillator,
    transport: TransportSync,
    snapshot: TransportSnapshot,
    block: BlockSettings,
    sample_index: usize,
    was_playing: bool,
}

impl ModulationPipeline {
    pub fn new(store: &ParameterStore, config: ModulationConfig) -> Result<Self, SchemaError> {
        let params = AutopanParams::resolve(store)?;
        let range_of = |index: usize| store.def(index).map_or((0.0, 1.0), |def| def.range());

        let oscillator = || {
            Oscillator::new()
                .with_policy(config.sync_policy)
                .with_phase_invert(config.phase_invert)
        };

        let gain_lfo = oscillator();
        let pan_lfo = oscillator();

        let mut transport = TransportSync::new(config.default_bpm);
        let snapshot = transport.pull(None, 0);

        Ok(Self {
            config,
            gain_range: range_of(params.gain.index()),
            boost_range: range_of(params.boost.index()),
            params,
            bank: SmoothingBank::default(),
            gain_lfo,
            pan_lfo,
            transport,
            snapshot,
            block: BlockSettings::default(),
            sample_index: 0,
            was_playing: false,
        })
    }

    pub fn config(&self) -> &ModulationConfig {
        &self.config
    }

    pub fn params(&self) -> &AutopanParams {
        &self.params
    }

    /// Allocate-free setup for a sample rate. Snaps ramps to the store.
    pub fn prepare(&mut self, sample_rate: f32, store: &ParameterStore) {
        self.bank.prepare(sample_rate, self.config.ramp_seconds);
        self.gain_lfo.prepare(sample_rate);
        self.pan_lfo.prepare(sample_rate);
        self.transport.prepare(sample_rate);
        self.was_playing = false;
        self.reseed(store);

        tracing::debug!(sample_rate, ramp_seconds = self.config.ramp_seconds, "modulation pipeline prepared");
    }

    /// Snap ramps to the current store values (preset load, initialization).
    pub fn reseed(&mut self, store: &ParameterStore) {
        self.bank.reseed(&self.params, store);
    }

    /// Reseed, rewind LFO phase and the synthesized transport position.
    pub fn reset(&mut self, store: &ParameterStore) {
        self.gain_lfo.reset();
        self.pan_lfo.reset();
        self.transport.reset();
        self.was_playing = false;
        self.reseed(store);
    }

    /// Block setup: new ramp targets, LFO configuration, transport snapshot.
    pub fn begin_block(
        &mut self,
        store: &ParameterStore,
        host: Option<&dyn HostTransport>,
        num_samples: usize,
    ) -> TransportSnapshot {
        let snapshot = self.transport.pull(host, num_samples);

        self.bank.set_targets(&self.params, store);
        self.block = BlockSettings {
            gain_curve: self.params.gain_curve.get(store),
            boost_curve: self.params.boost_curve.get(store),
            law: self.params.panning_law.get(store),
        };

        let meter = self.config.honor_meter.then_some(snapshot.time_signature);
        let restarted = snapshot.is_playing && !self.was_playing;
        self.was_playing = snapshot.is_playing;

        for (lfo, lfo_params) in [
            (&mut self.gain_lfo, &self.params.gain_lfo),
            (&mut self.pan_lfo, &self.params.pan_lfo),
        ] {
            configure_lfo(lfo, lfo_params, store, &snapshot, meter);
            if restarted {
                lfo.rearm();
            }
            if self.config.interpolation == PositionInterpolation::PerBlock {
                lfo.sync_to_host_position(snapshot.position);
            }
        }

        self.snapshot = snapshot;
        self.sample_index = 0;
        snapshot
    }

    /// Coefficients for the next sample of the current block.
    #[inline]
    pub fn next_coefficients(&mut self) -> Coefficients {
        let values = self.bank.next();

        if self.config.interpolation == PositionInterpolation::PerSample {
            let position = self.snapshot.position_at(self.sample_index);
            self.gain_lfo.sync_to_host_position(position);
            self.pan_lfo.sync_to_host_position(position);
        }
        self.sample_index += 1;

        let gain = shape(self.block.gain_curve, values.gain, self.gain_range);
        let boost_db = shape(self.block.boost_curve, values.boost_db, self.boost_range);

        let gain = gain * gain_factor(self.gain_lfo.sample(), values.gain_lfo_amount);
        let pan = modulated_pan(
            values.pan,
            self.pan_lfo.sample(),
            values.pan_lfo_amount,
            self.config.pan_lfo_depth,
        );
        let (pan_l, pan_r) = self.block.law.apply(pan);

        Coefficients {
            gain,
            boost: decibels_to_gain(boost_db),
            pan_l,
            pan_r,
        }
    }

    /// Fill per-sample channel gains for the rest of the current block.
    pub fn render_coefficients(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(left.len(), right.len());

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let coefficients = self.next_coefficients();
            *l = coefficients.left();
            *r = coefficients.right();
        }
    }

    pub fn snapshot(&self) -> &TransportSnapshot {
        &self.snapshot
    }

    pub fn gain_lfo(&self) -> &Oscillator {
        &self.gain_lfo
    }

    pub fn pan_lfo(&self) -> &Oscillator {
        &self.pan_lfo
    }
}

fn configure_lfo(
    lfo: &mut Oscillator,
    params: &LfoParams,
    store: &ParameterStore,
    snapshot: &TransportSnapshot,
    meter: Option<TimeSignature>,
) {
    lfo.set_waveform(params.waveform.get(store));
    lfo.set_bpm(snapshot.bpm);

    match params.sync.get(store) {
        LfoSync::Synced => lfo.set_synced_note(params.rate.get(store), meter),
        LfoSync::Free => lfo.set_free_rate_hz(params.hz.get(store)),
    }
}

/// Apply a curve to a plain value through its normalized range.
#[inline]
fn shape(curve: Curve, value: f32, (min, max): (f32, f32)) -> f32 {
    let span = max - min;
    if span <= 0.0 {
        return value;
    }
    min + curve.apply((value - min) / span) * span
}
