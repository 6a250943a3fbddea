//! Host transport reconciliation.
//!
//! The host reports tempo, musical position, meter and play state once per
//! block, and any of it may be missing. [`TransportSync`] turns whatever the
//! host offers into a complete [`TransportSnapshot`], synthesizing a steadily
//! advancing position when the host has none so synced LFOs keep moving.

pub mod time_signature;

pub use time_signature::TimeSignature;

/// What the host reported for this block. `None` means "not reported".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HostPosition {
    pub bpm: Option<f64>,
    /// Musical position in quarter-note beats (PPQ position).
    pub ppq_position: Option<f64>,
    pub time_signature: Option<TimeSignature>,
    pub is_playing: bool,
}

/// Source of host transport information, queried once per block.
pub trait HostTransport {
    /// `None` when the host offers no playhead at all.
    fn position(&self) -> Option<HostPosition>;
}

impl HostTransport for HostPosition {
    fn position(&self) -> Option<HostPosition> {
        Some(*self)
    }
}

impl<T: HostTransport + ?Sized> HostTransport for &T {
    fn position(&self) -> Option<HostPosition> {
        (**self).position()
    }
}

/// Complete transport view for one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportSnapshot {
    /// Always finite and > 0.
    pub bpm: f64,
    /// Musical position at the first sample of the block, in beats, >= 0.
    pub position: f64,
    pub time_signature: TimeSignature,
    pub is_playing: bool,
    /// True when `position` came from the host rather than the fallback.
    pub from_host: bool,
    beats_per_sample: f64,
}

impl TransportSnapshot {
    /// Position `offset` samples into the block.
    #[inline]
    pub fn position_at(&self, offset: usize) -> f64 {
        self.position + offset as f64 * self.beats_per_sample
    }

    pub fn beats_per_sample(&self) -> f64 {
        self.beats_per_sample
    }
}

/// Per-block transport state, including the fallback position accumulator.
#[derive(Debug, Clone)]
pub struct TransportSync {
    sample_rate: f64,
    default_bpm: f64,
    fallback_position: f64,
}

impl TransportSync {
    pub fn new(default_bpm: f64) -> Self {
        let default_bpm = if default_bpm.is_finite() && default_bpm > 0.0 {
            default_bpm
        } else {
            crate::DEFAULT_BPM
        };

        Self {
            sample_rate: 44_100.0,
            default_bpm,
            fallback_position: 0.0,
        }
    }

    pub fn prepare(&mut self, sample_rate: f32) {
        self.sample_rate = f64::from(sample_rate);
        self.reset();
    }

    /// Rewind the synthesized position to zero.
    pub fn reset(&mut self) {
        self.fallback_position = 0.0;
    }

    /// Build the snapshot for a block of `num_samples` samples.
    ///
    /// With a playing host that reports a position, that position wins and
    /// the fallback accumulator is re-anchored to it. Otherwise the
    /// accumulator supplies the block-start position. Either way the
    /// accumulator then advances past this block.
    pub fn pull(&mut self, host: Option<&dyn HostTransport>, num_samples: usize) -> TransportSnapshot {
        let info = host.and_then(|h| h.position()).unwrap_or_default();

        let bpm = info
            .bpm
            .filter(|bpm| bpm.is_finite() && *bpm > 0.0)
            .unwrap_or(self.default_bpm);

        let time_signature = info
            .time_signature
            .filter(TimeSignature::is_valid)
            .unwrap_or_default();

        let host_position = info
            .ppq_position
            .filter(|ppq| info.is_playing && ppq.is_finite() && *ppq >= 0.0);

        let beats_per_sample = if self.sample_rate > 0.0 {
            (bpm / 60.0) / self.sample_rate
        } else {
            0.0
        };

        let (position, from_host) = match host_position {
            Some(ppq) => {
                self.fallback_position = ppq;
                (ppq, true)
            }
            None => (self.fallback_position, false),
        };

        self.fallback_position += num_samples as f64 * beats_per_sample;

        TransportSnapshot {
            bpm,
            position,
            time_signature,
            is_playing: info.is_playing,
            from_host,
            beats_per_sample,
        }
    }

    pub fn fallback_position(&self) -> f64 {
        self.fallback_position
    }
}

impl Default for TransportSync {
    fn default() -> Self {
        Self::new(crate::DEFAULT_BPM)
    }
}
