//! Moment Synth - Sound sources for the moment audio engine
//!
//! This crate provides the signal generators behind bells and ambient
//! textures. It knows nothing about scheduling or audio devices; the engine
//! crate places these sources on a render graph.
//!
//! # Core Components
//!
//! ## Oscillators
//!
//! - [`Oscillator`] - Sine oscillator with per-sample frequency input, used
//!   for tone partials, drones, and LFOs
//!
//! ```rust
//! use moment_synth::Oscillator;
//!
//! let mut osc = Oscillator::new(48000.0);
//! osc.set_frequency(220.0);
//!
//! // 2 Hz of vibrato around the carrier
//! let sample = osc.advance_with_frequency(220.0 + 2.0);
//! ```
//!
//! ## Noise
//!
//! - [`NoiseGenerator`] - Seedable white and pink noise buffers
//! - [`PinkFilter`] - Paul Kellet's pink noise filter
//! - [`NoiseShape`] - White or Pink
//!
//! ## Tones
//!
//! - [`tone_partials`] - Lay out the fundamental and harmonics of a bell tone
//! - [`ToneSpec`] / [`Partial`] - Tone request and resulting partials
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! moment-synth = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod noise;
pub mod oscillator;
pub mod tone;

pub use noise::{DEFAULT_BUFFER_SECONDS, NoiseGenerator, NoiseShape, PinkFilter};
pub use oscillator::Oscillator;
pub use tone::{
    ENVELOPE_FLOOR, HARMONIC_DECAY_SCALE, HARMONIC_RATIOS, Partial, ToneError, ToneSpec,
    tone_partials,
};
