//! Integration tests for moment-synth crate.
//!
//! Tests cover noise buffer statistics, pink noise spectral tilt, and
//! rendering a full tone from its partials and envelopes.

use moment_core::AudioParam;
use moment_synth::{
    ENVELOPE_FLOOR, NoiseGenerator, NoiseShape, Oscillator, ToneSpec, tone_partials,
};
use proptest::prelude::*;

const SR: f32 = 48000.0;

// ---------------------------------------------------------------------------
// 1. Noise buffers
// ---------------------------------------------------------------------------

#[test]
fn white_noise_is_roughly_uniform() {
    let mut noise = NoiseGenerator::new(1234);
    let buf = noise.generate_buffer(2.0, SR, NoiseShape::White);

    let mean: f32 = buf.iter().sum::<f32>() / buf.len() as f32;
    let var: f32 = buf.iter().map(|s| (s - mean) * (s - mean)).sum::<f32>() / buf.len() as f32;

    assert!(mean.abs() < 0.02, "white mean should be ~0, got {mean}");
    // Uniform on [-1, 1] has variance 1/3
    assert!((var - 1.0 / 3.0).abs() < 0.02, "white variance should be ~0.333, got {var}");
}

#[test]
fn pink_noise_has_less_high_frequency_energy_than_white() {
    // First-difference energy is a cheap high-frequency proxy.
    fn diff_energy(buf: &[f32]) -> f32 {
        let total: f32 = buf.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
        let level: f32 = buf.iter().map(|s| s * s).sum();
        total / level
    }

    let mut noise = NoiseGenerator::new(42);
    let white = noise.generate_buffer(1.0, SR, NoiseShape::White);
    let pink = noise.generate_buffer(1.0, SR, NoiseShape::Pink);

    let white_ratio = diff_energy(&white);
    let pink_ratio = diff_energy(&pink);
    assert!(
        pink_ratio < white_ratio * 0.8,
        "pink should be darker than white: pink {pink_ratio}, white {white_ratio}"
    );
}

#[test]
fn pink_noise_is_audible() {
    let mut noise = NoiseGenerator::new(8);
    let buf = noise.generate_default(SR, NoiseShape::Pink);
    let rms = (buf.iter().map(|s| s * s).sum::<f32>() / buf.len() as f32).sqrt();
    assert!(rms > 0.02 && rms < 0.5, "pink rms {rms} out of expected range");
}

// ---------------------------------------------------------------------------
// 2. Tone rendering
// ---------------------------------------------------------------------------

/// Render partials the way the engine does: oscillator times envelope, summed.
fn render_tone(spec: &ToneSpec, seconds: f32) -> Vec<f32> {
    let partials = tone_partials(spec).unwrap();
    let mut voices: Vec<(Oscillator, AudioParam, f64)> = partials
        .iter()
        .map(|p| {
            let mut osc = Oscillator::new(SR);
            osc.set_frequency(p.frequency_hz);
            let mut gain = AudioParam::new(0.0);
            for event in p.envelope() {
                gain.schedule(event);
            }
            (osc, gain, p.stop_time)
        })
        .collect();

    let frames = (seconds * SR) as usize;
    (0..frames)
        .map(|i| {
            let t = f64::from(i as u32) / f64::from(SR);
            voices
                .iter_mut()
                .filter(|(_, _, stop)| t < *stop)
                .map(|(osc, gain, _)| osc.advance() * gain.value_at(t))
                .sum()
        })
        .collect()
}

#[test]
fn tone_decays_to_silence() {
    let spec = ToneSpec {
        frequency_hz: 440.0,
        amplitude: 0.8,
        decay_seconds: 3.0,
        start_time: 0.0,
    };
    let out = render_tone(&spec, 3.5);

    let head_peak = out[..4800].iter().fold(0.0f32, |m, s| m.max(s.abs()));
    let tail_peak = out[(2.9 * SR) as usize..(3.0 * SR) as usize]
        .iter()
        .fold(0.0f32, |m, s| m.max(s.abs()));
    let after_stop = &out[(3.0 * SR) as usize + 1..];

    assert!(head_peak > 0.5, "tone onset should be loud, got {head_peak}");
    assert!(tail_peak < 0.01, "tone should have decayed, got {tail_peak}");
    assert!(after_stop.iter().all(|&s| s == 0.0), "no output after the stop time");
    assert!(out.iter().all(|s| s.is_finite()));
}

#[test]
fn every_partial_reaches_the_floor() {
    let spec = ToneSpec {
        frequency_hz: 528.0,
        amplitude: 0.8,
        decay_seconds: 4.0,
        start_time: 1.0,
    };
    for p in tone_partials(&spec).unwrap() {
        let mut gain = AudioParam::new(0.0);
        for event in p.envelope() {
            gain.schedule(event);
        }
        let v = gain.value_at(p.envelope_end);
        assert!((v - ENVELOPE_FLOOR).abs() < 1e-6, "partial x{} ended at {v}", p.ratio);
        assert_eq!(gain.value_at(p.start_time), p.amplitude);
    }
}

// ---------------------------------------------------------------------------
// 3. Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Pink noise never leaves [-1, 1], whatever the seed.
    #[test]
    fn pink_samples_are_bounded(seed in any::<u32>()) {
        let mut noise = NoiseGenerator::new(seed);
        let buf = noise.generate_buffer(0.25, SR, NoiseShape::Pink);
        for &s in &buf {
            prop_assert!((-1.0..=1.0).contains(&s), "seed {} produced {}", seed, s);
        }
    }

    /// Every valid tone has exactly four partials at integer multiples.
    #[test]
    fn tone_has_four_harmonic_partials(
        freq in 20.0f32..4000.0f32,
        amp in 0.001f32..1.0f32,
        decay in 0.01f32..30.0f32,
    ) {
        let spec = ToneSpec { frequency_hz: freq, amplitude: amp, decay_seconds: decay, start_time: 0.0 };
        let partials = tone_partials(&spec).unwrap();
        prop_assert_eq!(partials.len(), 4);
        for (p, ratio) in partials.iter().zip([1.0f32, 2.0, 3.0, 4.0]) {
            prop_assert!((p.frequency_hz - freq * ratio).abs() < 1e-3);
            prop_assert!(p.envelope_end <= p.stop_time);
        }
    }
}
