//! Moment Core - DSP primitives for the moment audio engine
//!
//! This crate provides the building blocks shared by the synthesis and engine
//! crates. Everything here is allocation-free in the per-sample path.
//!
//! # Core Abstractions
//!
//! ## Parameter Automation
//!
//! - [`AudioParam`] - A parameter timeline with `set value at time`, linear and
//!   exponential ramps, evaluated at an arbitrary time in seconds
//! - [`ParamEvent`] - One scheduled automation event
//!
//! ## Filters
//!
//! - [`Biquad`] - Second-order IIR filter with RBJ cookbook coefficients
//!
//! ## Noise
//!
//! - [`Xorshift32`] - Small, seedable PRNG for noise generation
//!
//! ## Utilities
//!
//! - [`clamp_unit`] - Clamp a control value to `[0, 1]`, mapping NaN to zero
//! - [`flush_denormal`] - Flush tiny values to zero in recursive filters
//!
//! # Example
//!
//! ```rust
//! use moment_core::{AudioParam, ParamEvent};
//!
//! let mut gain = AudioParam::new(0.0);
//! gain.schedule(ParamEvent::SetValue { value: 0.8, time: 0.0 });
//! gain.schedule(ParamEvent::ExponentialRamp { value: 0.001, end_time: 4.0 });
//!
//! assert_eq!(gain.value_at(0.0), 0.8);
//! assert!(gain.value_at(4.0) <= 0.001 + 1e-6);
//! ```
//!
//! # no_std Support
//!
//! Disable the default `std` feature to build without the standard library:
//!
//! ```toml
//! [dependencies]
//! moment-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod math;
pub mod param;
pub mod random;

// Re-export main types at crate root
pub use biquad::{Biquad, lowpass_coefficients};
pub use math::{clamp_unit, flush_denormal};
pub use param::{AudioParam, ParamEvent};
pub use random::Xorshift32;
