use crate::dsp::SmoothedRamp;
use crate::params::{AutopanParams, ParameterStore};

/// Smoothed values read by the per-sample loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedValues {
    pub gain: f32,
    pub boost_db: f32,
    pub pan: f32,
    pub gain_lfo_amount: f32,
    pub pan_lfo_amount: f32,
}

/// One ramp per modulatable parameter.
#[derive(Debug, Clone, Default)]
pub struct SmoothingBank {
    gain: SmoothedRamp,
    boost: SmoothedRamp,
    pan: SmoothedRamp,
    gain_lfo_amount: SmoothedRamp,
    pan_lfo_amount: SmoothedRamp,
}

impl SmoothingBank {
    fn ramps_mut(&mut self) -> [&mut SmoothedRamp; 5] {
        [
            &mut self.gain,
            &mut self.boost,
            &mut self.pan,
            &mut self.gain_lfo_amount,
            &mut self.pan_lfo_amount,
        ]
    }

    fn read(params: &AutopanParams, store: &ParameterStore) -> [f32; 5] {
        [
            params.gain.get(store),
            params.boost.get(store),
            params.pan.get(store),
            params.gain_lfo.amount.get(store),
            params.pan_lfo.amount.get(store),
        ]
    }

    pub fn prepare(&mut self, sample_rate: f32, ramp_seconds: f32) {
        for ramp in self.ramps_mut() {
            ramp.reset(sample_rate, ramp_seconds);
        }
    }

    /// Snap every ramp to the current store values (no ramp).
    pub fn reseed(&mut self, params: &AutopanParams, store: &ParameterStore) {
        let values = Self::read(params, store);
        for (ramp, value) in self.ramps_mut().into_iter().zip(values) {
            ramp.set_current_and_target(value);
        }
    }

    /// Point every ramp at the current store values.
    pub fn set_targets(&mut self, params: &AutopanParams, store: &ParameterStore) {
        let values = Self::read(params, store);
        for (ramp, value) in self.ramps_mut().into_iter().zip(values) {
            ramp.set_target(value);
        }
    }

    #[inline]
    pub fn next(&mut self) -> SmoothedValues {
        SmoothedValues {
            gain: self.gain.next(),
            boost_db: self.boost.next(),
            pan: self.pan.next(),
            gain_lfo_amount: self.gain_lfo_amount.next(),
            pan_lfo_amount: self.pan_lfo_amount.next(),
        }
    }

    pub fn is_smoothing(&self) -> bool {
        [
            &self.gain,
            &self.boost,
            &self.pan,
            &self.gain_lfo_amount,
            &self.pan_lfo_amount,
        ]
        .iter()
        .any(|ramp| ramp.is_smoothing())
    }
}
