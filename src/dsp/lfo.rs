//! Low Frequency Oscillator (LFO) with free-running and tempo-synced modes.

/*
Low Frequency Oscillators
=========================

An LFO is an oscillator running at sub-audio rates. Here it does not make
sound; it wobbles the gain (tremolo) or the pan position (auto-pan).

Vocabulary
----------

  phase         Position inside one cycle, always wrapped into [0, 1).
                The waveform is a pure function of phase.

  increment     How far phase moves per sample.
                  free:   increment = hz / sample_rate
                  synced: increment = 1 / samples_per_cycle

  beats/cycle   Musical length of one cycle, in host beats (quarter notes).
                A 1/4 note at 4/4 = 1 beat. A 1/1 note = 4 beats.

  musical       Host playback position in beats since the song start
  position      (PPQ position). Used to phase-align synced LFOs.


Waveforms
---------

    SINE        sin(2π · phase)
    TRIANGLE    4 · |phase - 0.5| - 1          (starts at +1, dips to -1)
    SQUARE      +1 for phase < 0.5, else -1
    SAW         2 · phase - 1                  (rising ramp)

All outputs stay in [-1, +1] (bipolar).


Free vs Synced
--------------

FREE: rate in Hz, phase accumulates on its own. Independent of the host.

SYNCED: rate in beats per cycle. The increment is derived from bpm:

    samples_per_cycle = beats_per_cycle × (60 / bpm) × sample_rate

Accumulating that increment alone drifts against the host over minutes, and
it knows nothing about loops or locates. So synced LFOs are re-anchored to
the host's musical position:

    phase = fmod(position, beats_per_cycle) / beats_per_cycle


Re-anchoring Policy
-------------------

CONTINUOUS: every sync call overwrites phase from the position. Loops and
    locates realign instantly, no drift ever. Default.

CYCLE RETRIGGER: the LFO runs on its own increment and only snaps to the
    host position when the position enters a different cycle (a boundary
    was crossed, or the host jumped). Smoother under jittery host clocks,
    but a mid-cycle locate is not corrected until the next boundary.


Degenerate Rates
----------------

bpm = 0 or beats_per_cycle = 0 would divide by zero. Instead of letting a
NaN reach the audio path, the oscillator switches itself off and outputs
0.0 until it gets a valid rate again.
*/

use crate::transport::TimeSignature;

/// Convert bipolar signal (-1.0 to +1.0) to unipolar (0.0 to 1.0).
#[inline]
pub fn bipolar_to_unipolar(bipolar: f32) -> f32 {
    (bipolar + 1.0) * 0.5
}

/// LFO waveform shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Triangle,
    Square,
    Saw,
    /// Unrecognized shape; renders silence.
    Off,
}

impl Waveform {
    /// Choice order as exposed by the `*LFOType` parameters.
    pub const CHOICES: [Waveform; 4] = [
        Waveform::Square,
        Waveform::Saw,
        Waveform::Triangle,
        Waveform::Sine,
    ];

    pub fn from_index(index: usize) -> Self {
        Self::CHOICES.get(index).copied().unwrap_or(Waveform::Off)
    }

    /// Case-insensitive lookup. Unknown names map to [`Waveform::Off`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "sine" => Waveform::Sine,
            "triangle" => Waveform::Triangle,
            "square" => Waveform::Square,
            "saw" => Waveform::Saw,
            _ => Waveform::Off,
        }
    }

    #[inline]
    pub fn render(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (phase * std::f32::consts::TAU).sin(),
            Waveform::Triangle => 4.0 * (phase - 0.5).abs() - 1.0,
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Saw => 2.0 * phase - 1.0,
            Waveform::Off => 0.0,
        }
    }
}

/// How `sync_to_host_position` treats the incoming musical position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPolicy {
    /// Phase is re-derived from the position on every call.
    #[default]
    Continuous,
    /// Phase only snaps when the position enters a different cycle.
    CycleRetrigger,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum RateMode {
    Free { increment: f64 },
    Synced { beats_per_cycle: f64, increment: f64 },
    Disabled,
}

/// Stateful LFO. Allocation-free; all state lives inline.
#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    sample_rate: f64,
    bpm: f64,
    phase: f64,
    mode: RateMode,
    policy: SyncPolicy,
    invert: bool,
    last_cycle: Option<u64>,
}

impl Oscillator {
    pub fn new() -> Self {
        Self {
            waveform: Waveform::default(),
            sample_rate: 44_100.0,
            bpm: crate::DEFAULT_BPM,
            phase: 0.0,
            mode: RateMode::Free { increment: 0.0 },
            policy: SyncPolicy::default(),
            invert: false,
            last_cycle: None,
        }
    }

    pub fn with_policy(mut self, policy: SyncPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_phase_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn prepare(&mut self, sample_rate: f32) {
        self.sample_rate = f64::from(sample_rate);
        self.reset();
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.last_cycle = None;
    }

    /// Forget the last seen cycle so the next sync call snaps, whatever the policy.
    pub fn rearm(&mut self) {
        self.last_cycle = None;
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    /// Set the waveform by name. Unrecognized names render silence.
    pub fn set_type(&mut self, name: &str) {
        self.waveform = Waveform::from_name(name);
    }

    pub fn set_policy(&mut self, policy: SyncPolicy) {
        self.policy = policy;
    }

    pub fn set_bpm(&mut self, bpm: f64) {
        self.bpm = bpm;
        if let RateMode::Synced { beats_per_cycle, .. } = self.mode {
            self.set_synced_rate(beats_per_cycle);
        }
    }

    /// Free-running rate in Hz. Leaves tempo-synced mode.
    pub fn set_free_rate_hz(&mut self, hz: f32) {
        let hz = f64::from(hz);
        if !hz.is_finite() || self.sample_rate <= 0.0 {
            self.mode = RateMode::Disabled;
            return;
        }
        self.mode = RateMode::Free {
            increment: hz.max(0.0) / self.sample_rate,
        };
    }

    /// Tempo-synced rate: exactly `beats_per_cycle` host beats per cycle.
    pub fn set_synced_rate(&mut self, beats_per_cycle: f64) {
        let valid = beats_per_cycle.is_finite()
            && beats_per_cycle > 0.0
            && self.bpm.is_finite()
            && self.bpm > 0.0
            && self.sample_rate > 0.0;

        if !valid {
            self.mode = RateMode::Disabled;
            return;
        }

        let samples_per_cycle = beats_per_cycle * (60.0 / self.bpm) * self.sample_rate;
        self.mode = RateMode::Synced {
            beats_per_cycle,
            increment: 1.0 / samples_per_cycle,
        };
    }

    /// Tempo-synced rate from a note length in whole notes (1/4 = quarter).
    ///
    /// With a time signature the cycle is scaled by `numerator / denominator`.
    pub fn set_synced_note(&mut self, note_length: f32, time_signature: Option<TimeSignature>) {
        self.set_synced_rate(beats_per_cycle(note_length, time_signature));
    }

    /// Re-anchor phase to a host musical position (in beats).
    ///
    /// Only affects tempo-synced mode.
    pub fn sync_to_host_position(&mut self, position_beats: f64) {
        let RateMode::Synced { beats_per_cycle, .. } = self.mode else {
            return;
        };

        let position = if position_beats.is_finite() {
            position_beats.max(0.0)
        } else {
            0.0
        };

        match self.policy {
            SyncPolicy::Continuous => {
                self.phase = wrap((position % beats_per_cycle) / beats_per_cycle);
            }
            SyncPolicy::CycleRetrigger => {
                let cycle = (position / beats_per_cycle).floor() as u64;
                if self.last_cycle != Some(cycle) {
                    self.phase = wrap((position % beats_per_cycle) / beats_per_cycle);
                    self.last_cycle = Some(cycle);
                }
            }
        }
    }

    /// Evaluate the waveform at the current phase, then advance.
    #[inline]
    pub fn sample(&mut self) -> f32 {
        let increment = match self.mode {
            RateMode::Free { increment } => increment,
            RateMode::Synced { increment, .. } => increment,
            RateMode::Disabled => return 0.0,
        };

        let mut value = self.waveform.render(self.phase as f32);
        if self.invert {
            value = -value;
        }

        self.phase = wrap(self.phase + increment);
        value
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn is_synced(&self) -> bool {
        matches!(self.mode, RateMode::Synced { .. })
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self.mode, RateMode::Disabled)
    }

    pub fn beats_per_cycle(&self) -> Option<f64> {
        match self.mode {
            RateMode::Synced { beats_per_cycle, .. } => Some(beats_per_cycle),
            _ => None,
        }
    }
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new()
    }
}

/// Beats per cycle for a note length in whole notes.
pub fn beats_per_cycle(note_length: f32, time_signature: Option<TimeSignature>) -> f64 {
    let scale = time_signature.map_or(1.0, |ts| ts.ratio());
    f64::from(note_length) * 4.0 * scale
}

#[inline]
fn wrap(phase: f64) -> f64 {
    let wrapped = phase - phase.floor();
    // floor rounding can land exactly on 1.0 for tiny negative inputs
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}
