//! Last-resort output protection.
//!
//! A NaN or a runaway sample reaching a DAC or a downstream plugin can do
//! real damage (speaker excursion, poisoned filter states further down the
//! chain). After a block is rendered, [`check_audio_safety`] scans it and, if
//! anything is non-finite or outside [-2, 2], zeroes every channel.
//!
//! This is independent of the modulation math: it only looks at the finished
//! buffer, trading a one-block dropout for guaranteed sane output.

/// Samples beyond this magnitude count as corrupt.
pub const SAFE_LIMIT: f32 = 2.0;

/// Why a buffer was cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyFault {
    NotANumber,
    Infinite,
    OutOfRange,
}

/// Classify one sample.
#[inline]
pub fn sample_fault(value: f32) -> Option<SafetyFault> {
    if value.is_nan() {
        Some(SafetyFault::NotANumber)
    } else if value.is_infinite() {
        Some(SafetyFault::Infinite)
    } else if !(-SAFE_LIMIT..=SAFE_LIMIT).contains(&value) {
        Some(SafetyFault::OutOfRange)
    } else {
        None
    }
}

/// Scan all channels; on the first fault, zero every channel.
///
/// Returns the fault that triggered the clear, if any.
pub fn check_audio_safety(channels: &mut [&mut [f32]]) -> Option<SafetyFault> {
    let fault = channels
        .iter()
        .flat_map(|channel| channel.iter())
        .find_map(|&value| sample_fault(value))?;

    for channel in channels.iter_mut() {
        channel.fill(0.0);
    }

    Some(fault)
}
