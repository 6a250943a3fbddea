//! Gain primitives and decibel conversion.

/*
Gain
====

Vocabulary
----------

  gain          A multiplier applied to amplitude.
                  gain > 1.0  →  louder (amplification)
                  gain = 1.0  →  unchanged (unity gain)
                  gain < 1.0  →  quieter (attenuation)
                  gain = 0.0  →  silence


Decibels
--------

Hearing is logarithmic, so level controls such as boost are expressed in
decibels and converted to a linear multiplier just before use.

    gain = 10^(dB / 20)
    dB   = 20 × log₁₀(gain)

Reference points:
    ×1.0   =   0 dB  (unity, no change)
    ×0.5   ≈  -6 dB
    ×2.0   ≈  +6 dB
    ×3.98  ≈ +12 dB  (top of the boost range)

Gain 0.0 has no finite dB value. `gain_to_decibels` reports a floor value
(MINUS_INFINITY_DB) instead so display code never prints "-inf".
*/

/// Floor used when converting silence to decibels.
pub const MINUS_INFINITY_DB: f32 = -100.0;

/// Convert decibels to a linear gain factor.
///
/// Values at or below [`MINUS_INFINITY_DB`] map to silence.
#[inline]
pub fn decibels_to_gain(db: f32) -> f32 {
    if db > MINUS_INFINITY_DB {
        10.0_f32.powf(db * 0.05)
    } else {
        0.0
    }
}

/// Convert a linear gain factor to decibels, floored at [`MINUS_INFINITY_DB`].
#[inline]
pub fn gain_to_decibels(gain: f32) -> f32 {
    if gain > 0.0 {
        (20.0 * gain.log10()).max(MINUS_INFINITY_DB)
    } else {
        MINUS_INFINITY_DB
    }
}

/// Multiply a signal by a constant gain factor (in-place).
#[inline]
pub fn apply_gain(signal: &mut [f32], gain: f32) {
    for sample in signal.iter_mut() {
        *sample *= gain;
    }
}

/// Multiply a signal by a modulator, writing result into signal buffer (in-place).
#[inline]
pub fn multiply_in_place(signal: &mut [f32], modulator: &[f32]) {
    debug_assert_eq!(signal.len(), modulator.len());

    for (s, &m) in signal.iter_mut().zip(modulator.iter()) {
        *s *= m;
    }
}
