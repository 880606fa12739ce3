//! Mathematical utility functions for DSP and control values.

/// Clamp a control value (volume, mix) to `[0.0, 1.0]`.
///
/// NaN maps to `0.0` so a bad slider value silences rather than poisons the
/// signal path.
///
/// # Example
/// ```rust
/// use moment_core::clamp_unit;
///
/// assert_eq!(clamp_unit(1.5), 1.0);
/// assert_eq!(clamp_unit(-0.2), 0.0);
/// assert_eq!(clamp_unit(f32::NAN), 0.0);
/// ```
#[inline]
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Flush denormal values to zero.
///
/// Subnormal floats cause severe CPU slowdowns on most architectures. Values
/// below 1e-20 are replaced with zero, well before the subnormal range.
///
/// Use this in feedback paths (filter state) where the signal can decay
/// indefinitely toward zero.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}
