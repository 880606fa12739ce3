//! Countdown timer for a sitting.
//!
//! The timer does no timekeeping of its own; the caller drives it with one
//! [`Timer::tick`] per elapsed second.

use std::fmt;

use thiserror::Error;

/// Where the countdown is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerState {
    /// Not started.
    Idle,
    /// Counting down.
    Running,
    /// Started, then paused.
    Paused,
    /// Ran out or was finished early.
    Completed,
}

/// Timer misuse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    /// The duration cannot change once a session has begun.
    #[error("cannot change the duration while a session is in progress")]
    SessionActive,
    /// Zero-length sessions are not allowed.
    #[error("duration must be at least one second")]
    ZeroDuration,
}

/// Seconds-resolution countdown with pause and early finish.
#[derive(Clone, Debug)]
pub struct Timer {
    duration: u32,
    remaining: u32,
    state: TimerState,
}

impl Timer {
    /// An idle timer of `duration_seconds`.
    pub fn new(duration_seconds: u32) -> Self {
        let duration = duration_seconds.max(1);
        Self {
            duration,
            remaining: duration,
            state: TimerState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Full session length in seconds.
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Seconds left.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Seconds sat so far.
    pub fn elapsed(&self) -> u32 {
        self.duration - self.remaining
    }

    /// Whether a session has begun and not been reset.
    pub fn is_active(&self) -> bool {
        self.state != TimerState::Idle
    }

    /// Fraction of the session done, in [0, 1].
    pub fn progress(&self) -> f32 {
        self.elapsed() as f32 / self.duration as f32
    }

    /// Change the session length. Refused once a session has begun.
    pub fn set_duration(&mut self, seconds: u32) -> Result<(), TimerError> {
        if self.is_active() {
            return Err(TimerError::SessionActive);
        }
        if seconds == 0 {
            return Err(TimerError::ZeroDuration);
        }
        self.duration = seconds;
        self.remaining = seconds;
        Ok(())
    }

    /// Start or resume. A completed timer starts over.
    pub fn start(&mut self) {
        match self.state {
            TimerState::Idle | TimerState::Paused => self.state = TimerState::Running,
            TimerState::Completed => {
                self.reset();
                self.state = TimerState::Running;
            }
            TimerState::Running => {}
        }
    }

    /// Pause a running timer.
    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
        }
    }

    /// Start if stopped, pause if running.
    pub fn toggle(&mut self) {
        if self.state == TimerState::Running {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Advance one second. Returns `true` on the tick that completes the
    /// session.
    pub fn tick(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = TimerState::Completed;
            return true;
        }
        false
    }

    /// End a running or paused session now. Returns the seconds actually
    /// sat, or `None` if no session was in progress.
    pub fn finish_early(&mut self) -> Option<u32> {
        match self.state {
            TimerState::Running | TimerState::Paused => {
                self.state = TimerState::Completed;
                Some(self.elapsed())
            }
            TimerState::Idle | TimerState::Completed => None,
        }
    }

    /// Back to idle with the full duration remaining.
    pub fn reset(&mut self) {
        self.state = TimerState::Idle;
        self.remaining = self.duration;
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_clock(self.remaining))
    }
}

/// Format seconds as `m:ss`.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
