//! Decaying multi-partial tones.
//!
//! A bell is a fundamental plus three harmonics. Each partial is a sine whose
//! amplitude jumps to its peak at the start time and decays exponentially to
//! a near-zero floor. This module computes the partial layout and envelope
//! automation; scheduling onto a render graph happens in the engine.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use core::fmt;

use moment_core::ParamEvent;

/// Frequency ratios of the harmonics above the fundamental.
pub const HARMONIC_RATIOS: [f32; 3] = [2.0, 3.0, 4.0];

/// Level an exponential envelope decays to. Exponential ramps cannot reach zero.
pub const ENVELOPE_FLOOR: f32 = 0.001;

/// Fraction of the decay time over which harmonics fade.
pub const HARMONIC_DECAY_SCALE: f32 = 0.8;

/// Reasons a tone cannot be built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToneError {
    /// Frequency was zero, negative, or not finite.
    InvalidFrequency(f32),
    /// Decay time was zero, negative, or not finite.
    InvalidDecay(f32),
}

impl fmt::Display for ToneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFrequency(hz) => write!(f, "tone frequency must be positive, got {hz}"),
            Self::InvalidDecay(s) => write!(f, "tone decay must be positive, got {s}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ToneError {}

/// Parameters of a single decaying tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    /// Fundamental frequency in Hz
    pub frequency_hz: f32,
    /// Peak amplitude of the fundamental
    pub amplitude: f32,
    /// Seconds until the tone is stopped
    pub decay_seconds: f32,
    /// Clock time in seconds at which the tone starts
    pub start_time: f64,
}

impl ToneSpec {
    /// Check that frequency and decay are usable.
    pub fn validate(&self) -> Result<(), ToneError> {
        if !self.frequency_hz.is_finite() || self.frequency_hz <= 0.0 {
            return Err(ToneError::InvalidFrequency(self.frequency_hz));
        }
        if !self.decay_seconds.is_finite() || self.decay_seconds <= 0.0 {
            return Err(ToneError::InvalidDecay(self.decay_seconds));
        }
        Ok(())
    }

    /// Clock time at which every partial stops.
    pub fn stop_time(&self) -> f64 {
        self.start_time + f64::from(self.decay_seconds)
    }
}

/// One sine component of a tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partial {
    /// Multiple of the fundamental (1.0 for the fundamental itself)
    pub ratio: f32,
    /// Oscillator frequency in Hz
    pub frequency_hz: f32,
    /// Peak amplitude
    pub amplitude: f32,
    /// Clock time at which the envelope reaches [`ENVELOPE_FLOOR`]
    pub envelope_end: f64,
    /// Clock time at which the oscillator starts
    pub start_time: f64,
    /// Clock time at which the oscillator stops
    pub stop_time: f64,
}

impl Partial {
    /// Gain automation for this partial: hold the peak at the start, then
    /// decay exponentially to the floor.
    pub fn envelope(&self) -> [ParamEvent; 2] {
        [
            ParamEvent::SetValue {
                value: self.amplitude,
                time: self.start_time,
            },
            ParamEvent::ExponentialRamp {
                value: ENVELOPE_FLOOR,
                end_time: self.envelope_end,
            },
        ]
    }
}

/// Lay out the partials of a tone.
///
/// Returns the fundamental followed by the harmonics in ratio order. A
/// non-positive amplitude yields no partials.
///
/// # Example
///
/// ```rust
/// use moment_synth::{ToneSpec, tone_partials};
///
/// let partials = tone_partials(&ToneSpec {
///     frequency_hz: 528.0,
///     amplitude: 0.8,
///     decay_seconds: 4.0,
///     start_time: 0.0,
/// })
/// .unwrap();
///
/// let freqs: Vec<f32> = partials.iter().map(|p| p.frequency_hz).collect();
/// assert_eq!(freqs, [528.0, 1056.0, 1584.0, 2112.0]);
/// ```
pub fn tone_partials(spec: &ToneSpec) -> Result<Vec<Partial>, ToneError> {
    spec.validate()?;
    if !(spec.amplitude > 0.0) {
        return Ok(Vec::new());
    }

    let stop_time = spec.stop_time();
    let mut partials = Vec::with_capacity(1 + HARMONIC_RATIOS.len());

    partials.push(Partial {
        ratio: 1.0,
        frequency_hz: spec.frequency_hz,
        amplitude: spec.amplitude,
        envelope_end: stop_time,
        start_time: spec.start_time,
        stop_time,
    });

    let harmonic_end = spec.start_time + f64::from(spec.decay_seconds * HARMONIC_DECAY_SCALE);
    partials.extend(HARMONIC_RATIOS.iter().map(|&ratio| Partial {
        ratio,
        frequency_hz: spec.frequency_hz * ratio,
        amplitude: spec.amplitude / (ratio * 2.0),
        envelope_end: harmonic_end,
        start_time: spec.start_time,
        stop_time,
    }));

    Ok(partials)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bowl(amplitude: f32) -> ToneSpec {
        ToneSpec {
            frequency_hz: 528.0,
            amplitude,
            decay_seconds: 4.0,
            start_time: 10.0,
        }
    }

    #[test]
    fn test_partial_amplitudes() {
        let partials = tone_partials(&bowl(0.8)).unwrap();
        let amps: Vec<f32> = partials.iter().map(|p| p.amplitude).collect();
        let expected = [0.8, 0.2, 0.8 / 6.0, 0.1];
        for (a, e) in amps.iter().zip(expected) {
            assert!((a - e).abs() < 1e-6, "amplitude {a} != {e}");
        }
    }

    #[test]
    fn test_envelope_end_times() {
        let partials = tone_partials(&bowl(0.8)).unwrap();
        assert_eq!(partials[0].envelope_end, 14.0);
        for p in &partials[1..] {
            assert!((p.envelope_end - 13.2).abs() < 1e-6);
            assert_eq!(p.stop_time, 14.0);
        }
    }

    #[test]
    fn test_zero_amplitude_is_empty() {
        assert!(tone_partials(&bowl(0.0)).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut spec = bowl(0.5);
        spec.frequency_hz = 0.0;
        assert_eq!(tone_partials(&spec), Err(ToneError::InvalidFrequency(0.0)));

        let mut spec = bowl(0.5);
        spec.decay_seconds = -1.0;
        assert_eq!(tone_partials(&spec), Err(ToneError::InvalidDecay(-1.0)));

        let mut spec = bowl(0.5);
        spec.decay_seconds = f32::INFINITY;
        assert!(tone_partials(&spec).is_err());
    }

    #[test]
    fn test_envelope_events() {
        let partials = tone_partials(&bowl(0.8)).unwrap();
        let [hold, decay] = partials[0].envelope();
        assert_eq!(hold, ParamEvent::SetValue { value: 0.8, time: 10.0 });
        assert_eq!(
            decay,
            ParamEvent::ExponentialRamp {
                value: ENVELOPE_FLOOR,
                end_time: 14.0
            }
        );
    }
}
