//! Linear parameter ramps for click-free value changes.

/*
Parameter Smoothing
===================

Parameters arrive once per block, but audio runs once per sample. Jumping
straight to a new gain value produces a step in the waveform, heard as a
click, or as "zipper noise" when the knob moves continuously. A ramp spreads
the change across a fixed number of samples instead.

Vocabulary
----------

  current     The value handed to the audio path this sample.

  target      Where the ramp is heading. Set once per block.

  steps       Number of samples a full ramp takes:
                steps = floor(duration × sample_rate)

  countdown   Samples left in the current ramp. Zero means settled.


The Math
--------

On set_target:

    increment = (target - current) / steps
    countdown = steps

On next:

    countdown -= 1
    current   += increment        (while countdown > 0)
    current    = target           (on the final step)

The final step assigns the target directly instead of adding, so after
`steps` calls the value is bit-exact no matter how the increments rounded.
No overshoot: each step moves toward the target by the same amount.


Re-seeding
----------

At startup, or after a preset load, `current` is stale. Ramping from 0.0 to
the real gain would fade in audibly, so `set_current_and_target` snaps both
and clears the countdown.
*/

/// A linearly ramped value.
#[derive(Debug, Clone)]
pub struct SmoothedRamp {
    current: f32,
    target: f32,
    increment: f32,
    countdown: u32,
    steps: u32,
}

impl SmoothedRamp {
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            increment: 0.0,
            countdown: 0,
            steps: 0,
        }
    }

    /// Recompute ramp length for a sample rate and duration in seconds.
    ///
    /// Snaps to the current target; any ramp in flight is dropped.
    pub fn reset(&mut self, sample_rate: f32, duration_seconds: f32) {
        let steps = (duration_seconds.max(0.0) * sample_rate.max(0.0)).floor();
        self.steps = if steps.is_finite() { steps as u32 } else { 0 };
        self.set_current_and_target(self.target);
    }

    /// Number of `next` calls a full ramp takes.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn set_target(&mut self, target: f32) {
        if target == self.target {
            return;
        }

        if self.steps == 0 {
            self.set_current_and_target(target);
            return;
        }

        self.target = target;
        self.countdown = self.steps;
        self.increment = (self.target - self.current) / self.steps as f32;
    }

    pub fn set_current_and_target(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.increment = 0.0;
        self.countdown = 0;
    }

    /// Advance one sample and return the new value.
    #[inline]
    pub fn next(&mut self) -> f32 {
        if self.countdown == 0 {
            return self.target;
        }

        self.countdown -= 1;

        if self.countdown == 0 {
            self.current = self.target;
        } else {
            self.current += self.increment;
        }

        self.current
    }

    #[inline]
    pub fn current(&self) -> f32 {
        if self.countdown == 0 {
            self.target
        } else {
            self.current
        }
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_smoothing(&self) -> bool {
        self.countdown > 0
    }
}

impl Default for SmoothedRamp {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;
    const DURATION: f32 = 0.02;

    fn ramp(initial: f32) -> SmoothedRamp {
        let mut ramp = SmoothedRamp::new(initial);
        ramp.reset(SAMPLE_RATE, DURATION);
        ramp
    }

    #[test]
    fn reaches_target_exactly() {
        let mut ramp = ramp(0.0);
        ramp.set_target(0.73);

        let steps = (DURATION * SAMPLE_RATE).ceil() as usize;
        for _ in 0..steps {
            ramp.next();
        }

        assert_eq!(ramp.current(), 0.73);
        assert!(!ramp.is_smoothing());
    }

    #[test]
    fn moves_monotonically_without_overshoot() {
        let mut ramp = ramp(1.0);
        ramp.set_target(0.25);

        let mut previous = 1.0;
        for _ in 0..ramp.steps() {
            let value = ramp.next();
            assert!(value <= previous, "ramp went backwards: {} > {}", value, previous);
            assert!(value >= 0.25, "ramp overshot target: {}", value);
            previous = value;
        }
    }

    #[test]
    fn retarget_mid_ramp_starts_from_current() {
        let mut ramp = ramp(0.0);
        ramp.set_target(1.0);
        for _ in 0..(ramp.steps() / 2) {
            ramp.next();
        }

        let midway = ramp.current();
        ramp.set_target(0.0);
        let first = ramp.next();

        assert!(first < midway);
        assert!(first > 0.0);
    }

    #[test]
    fn reseed_skips_ramp() {
        let mut ramp = ramp(0.0);
        ramp.set_current_and_target(0.8);

        assert_eq!(ramp.next(), 0.8);
        assert!(!ramp.is_smoothing());
    }

    #[test]
    fn zero_duration_is_instant() {
        let mut ramp = SmoothedRamp::new(0.0);
        ramp.reset(SAMPLE_RATE, 0.0);
        ramp.set_target(0.5);

        assert_eq!(ramp.next(), 0.5);
    }
}
