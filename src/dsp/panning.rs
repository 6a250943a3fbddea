//! Panning laws: scalar pan position to left/right gain coefficients.

/*
Panning Laws
============

A pan control is a single number, but a stereo output needs two gains. The
panning law is the function that splits one into the other.

Vocabulary
----------

  pan           Position in the stereo field, -1.0 (hard left) to +1.0
                (hard right). 0.0 is center.

  pan_pos       The same position remapped to 0.0 .. 1.0:
                  pan_pos = (pan + 1) / 2

  coefficient   The gain applied to one channel. panL multiplies the left
                output, panR the right.

  power         Perceived loudness follows signal power (amplitude squared),
                so "constant power" means panL² + panR² stays fixed.


Constant Power
--------------

    angle = (pan + 1) × π/4        (0 at hard left, π/2 at hard right)
    panL  = cos(angle)
    panR  = sin(angle)

At center both channels sit at √½ ≈ 0.707 (-3 dB). Loudness stays even
through the whole sweep. cos² + sin² = 1 analytically, but f32 trig drifts a
hair at the extremes, so the pair is renormalized afterwards and clamped to
0..1. Without the clamp hard right would leave a -4e-8 residue on the left.


Triangle
--------

Piecewise linear with a plateau at center:

    panL                    panR
    1.0 ───────╲            1.0        ╱───────
                ╲                     ╱
    0.0          ╲          0.0 ─────╱
       -1    0    +1           -1   0    +1

Center is full level on both sides (no -3 dB dip). At the ends one channel
is silent and the other is untouched. Not power-normalized.


Linear
------

    panL = (1 - pan) / 2
    panR = (1 + pan) / 2

then both are divided by √(panL² + panR²). Without that step the center
would sit at 0.5/0.5 and dip audibly; after it, the law is power-normalized
like constant power but with a different taper shape.
*/

use std::f32::consts::FRAC_PI_4;

/// Selectable panning law.
///
/// Resolved once per block from the `panningLaw` choice parameter so the
/// per-sample path is a plain `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanningLaw {
    #[default]
    ConstantPower,
    Triangle,
    Linear,
}

impl PanningLaw {
    /// Choice order as exposed by the `panningLaw` parameter.
    pub const ALL: [PanningLaw; 3] = [
        PanningLaw::ConstantPower,
        PanningLaw::Triangle,
        PanningLaw::Linear,
    ];

    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }

    /// Map `pan` in [-1, 1] to `(panL, panR)`.
    ///
    /// The caller clamps `pan`; this function has no error cases.
    #[inline]
    pub fn apply(self, pan: f32) -> (f32, f32) {
        match self {
            PanningLaw::ConstantPower => constant_power(pan),
            PanningLaw::Triangle => triangle(pan),
            PanningLaw::Linear => linear(pan),
        }
    }
}

#[inline]
pub fn constant_power(pan: f32) -> (f32, f32) {
    let angle = (pan + 1.0) * FRAC_PI_4;
    let (sin, cos) = angle.sin_cos();
    let norm = 1.0 / (cos * cos + sin * sin).sqrt();
    // cos(π/2) rounds to a tiny negative in f32
    ((cos * norm).clamp(0.0, 1.0), (sin * norm).clamp(0.0, 1.0))
}

#[inline]
pub fn triangle(pan: f32) -> (f32, f32) {
    let pan_pos = (pan + 1.0) * 0.5;

    if pan_pos <= 0.5 {
        (1.0, 2.0 * pan_pos)
    } else {
        (2.0 * (1.0 - pan_pos), 1.0)
    }
}

#[inline]
pub fn linear(pan: f32) -> (f32, f32) {
    let left = 0.5 * (1.0 - pan);
    let right = 0.5 * (1.0 + pan);
    // left + right == 1, so the magnitude never reaches zero
    let norm = (left * left + right * right).sqrt();
    (left / norm, right / norm)
}
