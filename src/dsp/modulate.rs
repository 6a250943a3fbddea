//! Mapping LFO output onto gain and pan.

/*
Parameter Modulation
====================

The LFO produces a bipolar value in [-1, +1]. How that wobble lands on a
parameter depends on the parameter.

Vocabulary
----------

  modulator     The LFO output for this sample, in [-1, +1].

  amount        User depth control, 0.0 (no effect) to 1.0 (full effect).

  base value    The smoothed parameter value before modulation.


Gain (Tremolo)
--------------

Tremolo must never push gain above the knob setting, only pull it down.
The modulator is remapped from [-1, +1] onto [1 - amount, 1] and multiplied
in:

    factor = 1 - amount × (1 - lfo) / 2

    lfo = +1  →  factor = 1              (untouched)
    lfo = -1  →  factor = 1 - amount     (deepest dip)

With amount = 1 the square LFO fully gates the signal; with amount = 0 the
factor is exactly 1.0 and the path is transparent.


Pan (Auto-Pan)
--------------

Pan is bipolar already, so the LFO is added around the knob position:

    pan' = clamp(pan + lfo × amount × depth, -1, +1)

`depth` scales the excursion at full amount (0.5 by default, so a centered
pan swings between 50% left and 50% right). The clamp holds the result in
the domain the panning laws expect.
*/

use super::lfo::bipolar_to_unipolar;

/// Calculate the modulated parameter value: base + (modulator × depth).
#[inline]
pub fn apply_modulation(base_value: f32, modulator: f32, depth: f32) -> f32 {
    base_value + (modulator * depth)
}

/// Tremolo factor in [1 - amount, 1] for a bipolar modulator.
#[inline]
pub fn gain_factor(lfo: f32, amount: f32) -> f32 {
    let amount = amount.clamp(0.0, 1.0);
    1.0 - amount * (1.0 - bipolar_to_unipolar(lfo.clamp(-1.0, 1.0)))
}

/// Pan position offset by the modulator, clamped to [-1, 1].
#[inline]
pub fn modulated_pan(pan: f32, lfo: f32, amount: f32, depth: f32) -> f32 {
    apply_modulation(pan, lfo, amount.clamp(0.0, 1.0) * depth).clamp(-1.0, 1.0)
}
