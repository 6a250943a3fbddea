//! Control curves for perceptually even knob response.

/*
Control Curves
==============

A knob sweeps linearly from 0.0 to 1.0, but loudness is not perceived
linearly. Reshaping the normalized value before it is used spreads the
audible change more evenly across the knob travel.

    out
    1.0 ┐           ....---''  logarithmic (sqrt)
        │      .-''      _.-'  linear
        │   .'      _.-'   .'  exponential (x²)
        │  /    _.-'    .-'
    0.0 └/-.-'______..-'────── in
        0.0                1.0

  logarithmic   sqrt(x): rises fast, flattens near the top
  linear        x: unchanged
  exponential   x²: slow start, steep near the top

The input is always a normalized value in [0, 1]; both ends are fixed points
for every curve, so a curve never changes the range, only the spacing.
*/

/// Curve applied to a normalized control value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Curve {
    #[default]
    Linear,
    Logarithmic,
    Exponential,
}

impl Curve {
    /// Choice order as exposed by the `gainCurve` / `boostCurve` parameters.
    pub const ALL: [Curve; 3] = [Curve::Linear, Curve::Logarithmic, Curve::Exponential];

    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }

    #[inline]
    pub fn apply(self, x: f32) -> f32 {
        let x = x.clamp(0.0, 1.0);
        match self {
            Curve::Linear => x,
            Curve::Logarithmic => x.sqrt(),
            Curve::Exponential => x * x,
        }
    }
}
