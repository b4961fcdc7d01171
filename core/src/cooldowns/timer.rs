//! Timer entities (runtime state)
//!
//! A `Timer` is a single named countdown owned by a `CooldownScheduler`.
//!
//! # Lifecycle
//!
//! 1. `start` creates the timer with `remaining == period`
//! 2. Each tick adds to the timer's progress while it is active
//! 3. Progress reaching `period` fires the completion handler, then the timer is either
//!    removed (one-shot) or reset to `period` (repeating)
//!
//! Progress is kept in two parts. `Duration` advances are summed exactly.
//! `f64` ticks are summed as `f64` and only rounded to nanoseconds when
//! compared against the period, so `tick(p / 2)` twice lands on the same
//! nanosecond as `tick(p)`.

use std::time::Duration;

use super::HandlerError;

/// Callback invoked with the timer's key when it reaches zero
pub type CompletionHandler<K> = Box<dyn FnMut(&K) -> Result<(), HandlerError>>;

/// What happens to a timer after it fires. Fixed at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerMode {
    /// Removed after firing (ability cooldowns)
    #[default]
    OneShot,
    /// Reset to its full period after firing (weapon auto-fire)
    Repeating,
}

/// Externally visible state of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleState {
    NotScheduled,
    Running,
    Paused,
}

/// A single countdown
pub struct Timer<K> {
    pub(super) key: K,
    pub(super) period: Duration,
    /// Progress fed as `Duration` since start or the last reset
    pub(super) elapsed: Duration,
    /// Progress fed as `f64` seconds since start or the last reset
    pub(super) elapsed_secs: f64,
    pub(super) mode: TimerMode,
    /// Inactive timers are not decremented and may be pruned
    pub(super) active: bool,
    /// How many times this timer has fired
    pub(super) fired: u64,
    pub(super) handler: CompletionHandler<K>,
}

impl<K> Timer<K> {
    pub(super) fn new(key: K, period: Duration, mode: TimerMode, handler: CompletionHandler<K>) -> Self {
        Self {
            key,
            period,
            elapsed: Duration::ZERO,
            elapsed_secs: 0.0,
            mode,
            active: true,
            fired: 0,
            handler,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn remaining(&self) -> Duration {
        self.period.saturating_sub(self.progress())
    }

    fn progress(&self) -> Duration {
        let fractional = super::secs_to_duration(self.elapsed_secs).unwrap_or(Duration::MAX);
        self.elapsed.saturating_add(fractional)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn times_fired(&self) -> u64 {
        self.fired
    }

    /// Add `elapsed` to the progress.
    /// Returns true if the timer matured on this advance.
    pub(super) fn advance(&mut self, elapsed: Duration) -> bool {
        if !self.active {
            return false;
        }
        self.elapsed = self.elapsed.saturating_add(elapsed);
        self.remaining().is_zero()
    }

    /// Add `elapsed_secs` (already validated) to the progress.
    /// Returns true if the timer matured on this advance.
    pub(super) fn advance_secs(&mut self, elapsed_secs: f64) -> bool {
        if !self.active {
            return false;
        }
        self.elapsed_secs += elapsed_secs;
        self.remaining().is_zero()
    }

    /// Restart the countdown from the full period
    pub(super) fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.elapsed_secs = 0.0;
    }

    /// Fraction of the period still remaining (1.0 = just started, 0.0 = expired)
    pub fn fill_fraction(&self) -> f32 {
        let period = self.period.as_secs_f32();
        if period > 0.0 {
            (self.remaining().as_secs_f32() / period).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub(super) fn state(&self) -> ScheduleState {
        if self.active {
            ScheduleState::Running
        } else {
            ScheduleState::Paused
        }
    }
}

impl<K: std::fmt::Debug> std::fmt::Debug for Timer<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timer")
            .field("key", &self.key)
            .field("remaining", &self.remaining())
            .field("period", &self.period)
            .field("mode", &self.mode)
            .field("active", &self.active)
            .field("fired", &self.fired)
            .finish_non_exhaustive()
    }
}
