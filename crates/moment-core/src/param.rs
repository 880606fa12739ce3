//! Parameter automation timeline.
//!
//! [`AudioParam`] models a control value that can be changed immediately or
//! scheduled to change at a future time on the audio clock. Events are kept
//! sorted by time and evaluated lazily with [`AudioParam::value_at`], so the
//! render thread can sample the parameter once per frame without mutating it.
//!
//! Ramps interpolate from the previous event's value and time:
//!
//! ```text
//! linear:       v(t) = v0 + (v1 - v0) * (t - t0) / (t1 - t0)
//! exponential:  v(t) = v0 * (v1 / v0) ^ ((t - t0) / (t1 - t0))
//! ```
//!
//! An exponential ramp between values of different sign, or involving zero,
//! holds `v0` until its end time and then jumps to `v1`.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use libm::powf;

/// A scheduled change to an [`AudioParam`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamEvent {
    /// Jump to `value` at `time` seconds.
    SetValue {
        /// Target value
        value: f32,
        /// Clock time in seconds
        time: f64,
    },
    /// Ramp linearly from the previous event to `value`, arriving at `end_time`.
    LinearRamp {
        /// Target value
        value: f32,
        /// Clock time in seconds at which the target is reached
        end_time: f64,
    },
    /// Ramp exponentially from the previous event to `value`, arriving at `end_time`.
    ExponentialRamp {
        /// Target value
        value: f32,
        /// Clock time in seconds at which the target is reached
        end_time: f64,
    },
}

impl ParamEvent {
    /// The time at which this event has fully taken effect.
    pub fn time(&self) -> f64 {
        match *self {
            Self::SetValue { time, .. } => time,
            Self::LinearRamp { end_time, .. } | Self::ExponentialRamp { end_time, .. } => end_time,
        }
    }

    /// The value this event settles on.
    pub fn value(&self) -> f32 {
        match *self {
            Self::SetValue { value, .. }
            | Self::LinearRamp { value, .. }
            | Self::ExponentialRamp { value, .. } => value,
        }
    }
}

/// A control value with an automation timeline.
///
/// # Example
///
/// ```rust
/// use moment_core::{AudioParam, ParamEvent};
///
/// let mut freq = AudioParam::new(220.0);
/// freq.schedule(ParamEvent::LinearRamp { value: 440.0, end_time: 2.0 });
///
/// assert_eq!(freq.value_at(1.0), 330.0);
/// assert_eq!(freq.value_at(5.0), 440.0);
/// ```
#[derive(Debug, Clone)]
pub struct AudioParam {
    /// Value in effect before the first pending event.
    value: f32,
    /// Time from which the next ramp starts.
    anchor_time: f64,
    /// Pending events, sorted by [`ParamEvent::time`].
    events: Vec<ParamEvent>,
}

impl AudioParam {
    /// Create a parameter with an intrinsic value and no automation.
    pub fn new(value: f32) -> Self {
        Self {
            value,
            anchor_time: 0.0,
            events: Vec::new(),
        }
    }

    /// Set the value immediately, discarding all scheduled automation.
    pub fn set_value(&mut self, value: f32) {
        self.value = value;
        self.events.clear();
    }

    /// Schedule an automation event.
    ///
    /// Events with equal times keep their insertion order. Non-finite values
    /// or times are ignored.
    pub fn schedule(&mut self, event: ParamEvent) {
        if !event.value().is_finite() || !event.time().is_finite() {
            return;
        }
        let at = event.time();
        let index = self.events.partition_point(|e| e.time() <= at);
        self.events.insert(index, event);
    }

    /// Remove every event whose time is at or after `time`.
    pub fn cancel_from(&mut self, time: f64) {
        self.events.retain(|e| e.time() < time);
    }

    /// Evaluate the parameter at clock time `t` (seconds).
    pub fn value_at(&self, t: f64) -> f32 {
        let mut v0 = self.value;
        let mut t0 = self.anchor_time;

        for event in &self.events {
            match *event {
                ParamEvent::SetValue { value, time } => {
                    if t < time {
                        return v0;
                    }
                    v0 = value;
                    t0 = time;
                }
                ParamEvent::LinearRamp { value, end_time } => {
                    if t < end_time {
                        let span = end_time - t0;
                        if span <= 0.0 {
                            return value;
                        }
                        let frac = ((t - t0) / span).clamp(0.0, 1.0) as f32;
                        return v0 + (value - v0) * frac;
                    }
                    v0 = value;
                    t0 = end_time;
                }
                ParamEvent::ExponentialRamp { value, end_time } => {
                    if t < end_time {
                        if v0 == 0.0 || value == 0.0 || (v0 < 0.0) != (value < 0.0) {
                            return v0;
                        }
                        let span = end_time - t0;
                        if span <= 0.0 {
                            return value;
                        }
                        let frac = ((t - t0) / span).clamp(0.0, 1.0) as f32;
                        return v0 * powf(value / v0, frac);
                    }
                    v0 = value;
                    t0 = end_time;
                }
            }
        }

        v0
    }

    /// Fold every event that has completed by `t` into the intrinsic value.
    ///
    /// Does not change what [`value_at`](Self::value_at) returns for any
    /// time at or after `t`.
    pub fn prune(&mut self, t: f64) {
        let done = self.events.partition_point(|e| e.time() <= t);
        if done == 0 {
            return;
        }
        let last = self.events[done - 1];
        self.value = last.value();
        self.anchor_time = last.time();
        self.events.drain(..done);
    }

    /// Number of events still pending.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Whether any automation is scheduled.
    pub fn is_automated(&self) -> bool {
        !self.events.is_empty()
    }
}

impl Default for AudioParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}
