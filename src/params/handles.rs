use crate::dsp::{Curve, PanningLaw, Waveform};

use super::schema::SchemaError;
use super::store::{Choice, ChoiceParam, FloatParam, ParameterStore};

/// Whether an LFO follows its Hz rate or the host tempo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LfoSync {
    Free,
    #[default]
    Synced,
}

impl Choice for LfoSync {
    fn from_index(index: usize) -> Self {
        match index {
            0 => LfoSync::Free,
            _ => LfoSync::Synced,
        }
    }
}

impl Choice for Curve {
    fn from_index(index: usize) -> Self {
        Curve::from_index(index)
    }
}

impl Choice for PanningLaw {
    fn from_index(index: usize) -> Self {
        PanningLaw::from_index(index)
    }
}

impl Choice for Waveform {
    fn from_index(index: usize) -> Self {
        Waveform::from_index(index)
    }
}

/// Handles for one LFO's controls.
#[derive(Debug, Clone, Copy)]
pub struct LfoParams {
    pub waveform: ChoiceParam<Waveform>,
    pub sync: ChoiceParam<LfoSync>,
    /// Note length in whole notes, used when synced.
    pub rate: FloatParam,
    /// Free-running rate.
    pub hz: FloatParam,
    pub amount: FloatParam,
}

impl LfoParams {
    fn resolve(store: &ParameterStore, prefix: &str) -> Result<Self, SchemaError> {
        Ok(Self {
            waveform: store.choice(&format!("{}LFOType", prefix))?,
            sync: store.choice(&format!("{}LFOSync", prefix))?,
            rate: store.float(&format!("{}LFORate", prefix))?,
            hz: store.float(&format!("{}LFOHz", prefix))?,
            amount: store.float(&format!("{}LFOAmount", prefix))?,
        })
    }
}

/// Every parameter the modulation engine reads, resolved once at construction.
///
/// A missing or mistyped schema entry fails here, never in the audio callback.
#[derive(Debug, Clone, Copy)]
pub struct AutopanParams {
    pub gain: FloatParam,
    pub gain_curve: ChoiceParam<Curve>,
    pub boost: FloatParam,
    pub boost_curve: ChoiceParam<Curve>,
    pub pan: FloatParam,
    pub panning_law: ChoiceParam<PanningLaw>,
    pub gain_lfo: LfoParams,
    pub pan_lfo: LfoParams,
}

impl AutopanParams {
    pub fn resolve(store: &ParameterStore) -> Result<Self, SchemaError> {
        Ok(Self {
            gain: store.float("gain")?,
            gain_curve: store.choice("gainCurve")?,
            boost: store.float("boost")?,
            boost_curve: store.choice("boostCurve")?,
            pan: store.float("pan")?,
            panning_law: store.choice("panningLaw")?,
            gain_lfo: LfoParams::resolve(store, "gain")?,
            pan_lfo: LfoParams::resolve(store, "pan")?,
        })
    }
}
