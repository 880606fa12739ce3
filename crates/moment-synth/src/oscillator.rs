//! Sine oscillator for tones, drones, and low-frequency modulators.
//!
//! All sounds in moment are built from pure sines, so there is no
//! band-limiting machinery here. The phase accumulator is normalized to
//! `[0.0, 1.0)` and accepts a per-sample frequency so the render graph can
//! apply audio-rate vibrato.

use core::f32::consts::PI;
use libm::{floorf, sinf};

/// Wrap a normalized phase into `[0.0, 1.0)`, for any sign.
#[inline]
fn wrap_phase(phase: f32) -> f32 {
    let wrapped = phase - floorf(phase);
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

/// Sine oscillator with a normalized phase accumulator.
///
/// # Example
///
/// ```rust
/// use moment_synth::Oscillator;
///
/// let mut osc = Oscillator::new(48000.0);
/// osc.set_frequency(528.0);
///
/// let first = osc.advance();
/// assert_eq!(first, 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Oscillator {
    /// Current phase position [0.0, 1.0)
    phase: f32,
    /// Sample rate in Hz
    sample_rate: f32,
    /// Frequency in Hz
    frequency: f32,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Oscillator {
    /// Create a new oscillator at 440 Hz with the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            sample_rate,
            frequency: 440.0,
        }
    }

    /// Set frequency in Hz.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.frequency = freq_hz;
    }

    /// Get current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Get current sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Get current phase.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Reset phase to 0.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Generate the next sample at the configured frequency.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.advance_with_frequency(self.frequency)
    }

    /// Generate the next sample at an explicit frequency.
    ///
    /// Used when the frequency is modulated per sample. Negative and
    /// non-finite frequencies are tolerated: the phase runs backwards or
    /// holds.
    #[inline]
    pub fn advance_with_frequency(&mut self, freq_hz: f32) -> f32 {
        let output = sinf(2.0 * PI * self.phase);
        let inc = freq_hz / self.sample_rate;
        if inc.is_finite() {
            self.phase = wrap_phase(self.phase + inc);
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_crossings(samples: &[f32]) -> usize {
        samples
            .windows(2)
            .filter(|w| w[0] <= 0.0 && w[1] > 0.0)
            .count()
    }

    #[test]
    fn test_sine_frequency() {
        let sr = 48000.0;
        let mut osc = Oscillator::new(sr);
        osc.set_frequency(100.0);

        let samples: Vec<f32> = (0..48000).map(|_| osc.advance()).collect();
        let crossings = zero_crossings(&samples);
        assert!(
            (99..=101).contains(&crossings),
            "100 Hz for one second should cross upward ~100 times, got {crossings}"
        );
    }

    #[test]
    fn test_sine_range() {
        let mut osc = Oscillator::new(48000.0);
        osc.set_frequency(1046.0);
        for _ in 0..10000 {
            let s = osc.advance();
            assert!((-1.0..=1.0).contains(&s), "sample out of range: {s}");
        }
    }

    #[test]
    fn test_modulated_frequency_tracks_input() {
        let sr = 48000.0;
        let mut osc = Oscillator::new(sr);
        osc.set_frequency(100.0);

        let samples: Vec<f32> = (0..48000).map(|_| osc.advance_with_frequency(200.0)).collect();
        let crossings = zero_crossings(&samples);
        assert!((199..=201).contains(&crossings), "got {crossings}");
    }

    #[test]
    fn test_negative_frequency_wraps() {
        let mut osc = Oscillator::new(48000.0);
        for _ in 0..1000 {
            osc.advance_with_frequency(-300.0);
            assert!((0.0..1.0).contains(&osc.phase()));
        }
    }

    #[test]
    fn test_non_finite_frequency_holds_phase() {
        let mut osc = Oscillator::new(48000.0);
        osc.advance();
        let phase = osc.phase();
        osc.advance_with_frequency(f32::NAN);
        assert_eq!(osc.phase(), phase);
    }
}
