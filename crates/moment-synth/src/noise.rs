//! Noise buffer generation.
//!
//! Ambient textures loop a short pre-generated buffer rather than running a
//! noise source per sample. [`NoiseGenerator`] fills such buffers with white
//! noise or with pink noise shaped by Paul Kellet's refined filter.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use moment_core::Xorshift32;

/// Default loop length for ambient noise buffers, in seconds.
pub const DEFAULT_BUFFER_SECONDS: f32 = 2.0;

/// Spectral shape of a generated noise buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NoiseShape {
    /// Flat spectrum, uniform samples in [-1, 1].
    #[default]
    White,
    /// -3 dB/octave, Paul Kellet's approximation.
    Pink,
}

/// Paul Kellet's pink noise filter.
///
/// Seven first-order sections fed by white noise; `b6` is updated after the
/// output is summed, so it contributes one sample late.
#[derive(Debug, Clone, Default)]
pub struct PinkFilter {
    b: [f32; 7],
}

impl PinkFilter {
    /// Create a filter with all state at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all filter state.
    pub fn reset(&mut self) {
        self.b = [0.0; 7];
    }

    /// Filter one white sample. Output is not clamped.
    #[inline]
    pub fn process(&mut self, white: f32) -> f32 {
        let b = &mut self.b;
        b[0] = 0.99886 * b[0] + white * 0.0555179;
        b[1] = 0.99332 * b[1] + white * 0.0750759;
        b[2] = 0.969 * b[2] + white * 0.153852;
        b[3] = 0.8665 * b[3] + white * 0.3104856;
        b[4] = 0.55 * b[4] + white * 0.5329522;
        b[5] = -0.7616 * b[5] - white * 0.016898;
        let out = (b[0] + b[1] + b[2] + b[3] + b[4] + b[5] + b[6] + white * 0.5362) * 0.11;
        b[6] = white * 0.115926;
        out
    }
}

/// Seedable generator of white and pink noise buffers.
///
/// # Example
///
/// ```rust
/// use moment_synth::{NoiseGenerator, NoiseShape};
///
/// let mut noise = NoiseGenerator::new(1);
/// let buffer = noise.generate_buffer(2.0, 48000.0, NoiseShape::Pink);
///
/// assert_eq!(buffer.len(), 96000);
/// assert!(buffer.iter().all(|s| (-1.0..=1.0).contains(s)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct NoiseGenerator {
    rng: Xorshift32,
    pink: PinkFilter,
}

impl NoiseGenerator {
    /// Create a generator with a fixed seed.
    pub fn new(seed: u32) -> Self {
        Self {
            rng: Xorshift32::new(seed),
            pink: PinkFilter::new(),
        }
    }

    /// Generate `duration_seconds * sample_rate` samples of noise.
    ///
    /// Pink filter state starts from zero for every buffer. Invalid
    /// durations or sample rates produce an empty buffer.
    pub fn generate_buffer(
        &mut self,
        duration_seconds: f32,
        sample_rate: f32,
        shape: NoiseShape,
    ) -> Vec<f32> {
        let frames = duration_seconds * sample_rate;
        if !frames.is_finite() || frames < 1.0 {
            return Vec::new();
        }
        let len = frames as usize;

        match shape {
            NoiseShape::White => (0..len).map(|_| self.rng.next_bipolar()).collect(),
            NoiseShape::Pink => {
                self.pink.reset();
                (0..len)
                    .map(|_| {
                        let white = self.rng.next_bipolar();
                        self.pink.process(white).clamp(-1.0, 1.0)
                    })
                    .collect()
            }
        }
    }

    /// Generate a buffer of the default loop length.
    pub fn generate_default(&mut self, sample_rate: f32, shape: NoiseShape) -> Vec<f32> {
        self.generate_buffer(DEFAULT_BUFFER_SECONDS, sample_rate, shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_length() {
        let mut noise = NoiseGenerator::new(3);
        let buf = noise.generate_default(44100.0, NoiseShape::White);
        assert_eq!(buf.len(), 88200);
    }

    #[test]
    fn test_invalid_duration_is_empty() {
        let mut noise = NoiseGenerator::new(3);
        assert!(noise.generate_buffer(0.0, 48000.0, NoiseShape::White).is_empty());
        assert!(noise.generate_buffer(-1.0, 48000.0, NoiseShape::Pink).is_empty());
        assert!(noise.generate_buffer(f32::NAN, 48000.0, NoiseShape::Pink).is_empty());
    }

    #[test]
    fn test_white_is_not_constant() {
        let mut noise = NoiseGenerator::new(11);
        let buf = noise.generate_buffer(0.01, 48000.0, NoiseShape::White);
        let first = buf[0];
        assert!(buf.iter().any(|&s| s != first));
    }

    #[test]
    fn test_pink_first_sample_formula() {
        let mut rng = Xorshift32::new(5);
        let w = rng.next_bipolar();
        let expected = (w
            * (0.0555179 + 0.0750759 + 0.153852 + 0.3104856 + 0.5329522 - 0.016898 + 0.5362))
            * 0.11;

        let mut noise = NoiseGenerator::new(5);
        let buf = noise.generate_buffer(1.0, 100.0, NoiseShape::Pink);
        assert!(
            (buf[0] - expected.clamp(-1.0, 1.0)).abs() < 1e-6,
            "first pink sample {} != {expected}",
            buf[0]
        );
    }

    #[test]
    fn test_pink_b6_lags_one_sample() {
        let mut filter = PinkFilter::new();
        let first = filter.process(1.0);
        let second = filter.process(0.0);
        // Second output with zero input is the decayed state plus the delayed b6 term.
        let expected = (0.99886 * 0.0555179
            + 0.99332 * 0.0750759
            + 0.969 * 0.153852
            + 0.8665 * 0.3104856
            + 0.55 * 0.5329522
            + -0.7616 * -0.016898
            + 0.115926)
            * 0.11;
        assert!(first > 0.0);
        assert!((second - expected).abs() < 1e-6, "{second} != {expected}");
    }

    #[test]
    fn test_pink_state_resets_per_buffer() {
        let mut a = NoiseGenerator::new(9);
        let mut b = NoiseGenerator::new(9);

        let _ = a.generate_buffer(0.5, 1000.0, NoiseShape::Pink);
        let second = a.generate_buffer(0.5, 1000.0, NoiseShape::Pink);

        // Same PRNG position, fresh filter state.
        let _ = b.generate_buffer(0.5, 1000.0, NoiseShape::White);
        let mut filter = PinkFilter::new();
        let mut rng_state = b.rng.clone();
        let w = rng_state.next_bipolar();
        assert!((second[0] - filter.process(w).clamp(-1.0, 1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let mut a = NoiseGenerator::new(77);
        let mut b = NoiseGenerator::new(77);
        assert_eq!(
            a.generate_buffer(0.1, 48000.0, NoiseShape::Pink),
            b.generate_buffer(0.1, 48000.0, NoiseShape::Pink)
        );
    }
}
