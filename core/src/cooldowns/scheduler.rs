//! Cooldown scheduler
//!
//! Holds the authoritative state of every countdown for one owner and advances
//! them on a single logical clock. Hosts call `tick` from their periodic
//! callback; tests call it directly with exact elapsed values.
//!
//! Completion handlers run under `catch_unwind`. A panicking handler is logged
//! with `error!` and reported in `TickReport::failed`, but the process panic
//! hook still runs first: with the default hook a second, unstructured
//! "thread panicked" message goes to stderr. That message does not mean the
//! panic escaped the scheduler.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use tracing::{debug, error, warn};

use super::timer::{CompletionHandler, ScheduleState, Timer, TimerMode};
use super::{HandlerError, ManualTicks, SchedulerError, TickSource};

/// Outcome of a single `tick`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport<K> {
    /// Keys whose timers matured, in processing order
    pub completed: Vec<K>,
    /// Keys whose handler returned an error or panicked
    pub failed: Vec<K>,
}

impl<K> Default for TickReport<K> {
    fn default() -> Self {
        Self {
            completed: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<K> TickReport<K> {
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }
}

/// Tracks named countdown timers and fires their completion handlers.
///
/// At most one timer exists per key. Timers are processed in insertion order;
/// re-starting a key moves it to the end.
pub struct CooldownScheduler<K, S: TickSource = ManualTicks> {
    timers: Vec<Timer<K>>,
    tick_source: S,
    ticking: bool,
}

impl<K, S> Default for CooldownScheduler<K, S>
where
    K: Clone + PartialEq + std::fmt::Debug,
    S: TickSource + Default,
{
    fn default() -> Self {
        Self::with_tick_source(S::default())
    }
}

impl<K, S> CooldownScheduler<K, S>
where
    K: Clone + PartialEq + std::fmt::Debug,
    S: TickSource,
{
    pub fn new() -> Self
    where
        S: Default,
    {
        Self::default()
    }

    pub fn with_tick_source(tick_source: S) -> Self {
        Self {
            timers: Vec::new(),
            tick_source,
            ticking: false,
        }
    }

    // ─── Lifecycle ──────────────────────────────────────────────────────────

    /// Start (or replace) the timer for `key` with a period in seconds.
    ///
    /// Rejects non-positive or non-finite periods without touching existing state.
    pub fn start<F>(
        &mut self,
        key: K,
        period_secs: f64,
        mode: TimerMode,
        handler: F,
    ) -> Result<(), SchedulerError>
    where
        F: FnMut(&K) -> Result<(), HandlerError> + 'static,
    {
        let period = secs_to_duration(period_secs)
            .filter(|p| !p.is_zero())
            .ok_or(SchedulerError::InvalidPeriod { secs: period_secs })?;
        self.start_timer(key, period, mode, Box::new(handler))
    }

    /// Same as `start` with an already-typed period
    pub fn start_with_period<F>(
        &mut self,
        key: K,
        period: Duration,
        mode: TimerMode,
        handler: F,
    ) -> Result<(), SchedulerError>
    where
        F: FnMut(&K) -> Result<(), HandlerError> + 'static,
    {
        if period.is_zero() {
            return Err(SchedulerError::InvalidPeriod { secs: 0.0 });
        }
        self.start_timer(key, period, mode, Box::new(handler))
    }

    fn start_timer(
        &mut self,
        key: K,
        period: Duration,
        mode: TimerMode,
        handler: CompletionHandler<K>,
    ) -> Result<(), SchedulerError> {
        if let Some(idx) = self.position(&key) {
            self.timers.remove(idx);
            debug!(key = ?key, "replacing existing timer");
        }

        debug!(key = ?key, period_ms = period.as_millis() as u64, mode = ?mode, "timer started");
        self.timers.push(Timer::new(key, period, mode, handler));

        if !self.ticking {
            self.tick_source.acquire();
            self.ticking = true;
        }
        Ok(())
    }

    /// Remove the timer for `key`. Returns false if none was scheduled.
    pub fn stop(&mut self, key: &K) -> bool {
        let Some(idx) = self.position(key) else {
            return false;
        };
        self.timers.remove(idx);
        debug!(key = ?key, "timer stopped");
        self.release_if_idle();
        true
    }

    /// Remove every timer (owner teardown)
    pub fn clear(&mut self) {
        if !self.timers.is_empty() {
            debug!(count = self.timers.len(), "clearing all timers");
        }
        self.timers.clear();
        self.release_if_idle();
    }

    /// Stop decrementing `key` until resumed. Returns false if not scheduled.
    pub fn pause(&mut self, key: &K) -> bool {
        self.set_active(key, false)
    }

    /// Resume a paused timer. Returns false if not scheduled.
    pub fn resume(&mut self, key: &K) -> bool {
        self.set_active(key, true)
    }

    fn set_active(&mut self, key: &K, active: bool) -> bool {
        match self.timers.iter_mut().find(|t| &t.key == key) {
            Some(timer) => {
                timer.active = active;
                true
            }
            None => false,
        }
    }

    /// Remove all paused timers, returning their keys
    pub fn prune_inactive(&mut self) -> Vec<K> {
        let pruned: Vec<K> = self
            .timers
            .iter()
            .filter(|t| !t.active)
            .map(|t| t.key.clone())
            .collect();
        self.timers.retain(|t| t.active);
        self.release_if_idle();
        pruned
    }

    fn release_if_idle(&mut self) {
        if self.ticking && self.timers.is_empty() {
            self.tick_source.release();
            self.ticking = false;
        }
    }

    // ─── Clock ──────────────────────────────────────────────────────────────

    /// Advance all active timers by `elapsed_secs`.
    ///
    /// Rejects negative or non-finite values without advancing anything.
    /// Sub-nanosecond remainders carry over to the next `tick`, so splitting
    /// a period into several ticks fires at the same total as one tick.
    pub fn tick(&mut self, elapsed_secs: f64) -> Result<TickReport<K>, SchedulerError> {
        if secs_to_duration(elapsed_secs).is_none() {
            return Err(SchedulerError::InvalidElapsed { secs: elapsed_secs });
        }
        Ok(self.advance_with(|timer| timer.advance_secs(elapsed_secs)))
    }

    /// Advance all active timers by `elapsed`.
    ///
    /// Each matured timer fires its handler exactly once per call, even if
    /// `elapsed` spans several periods. A failing handler is logged and does not
    /// stop the remaining timers from being processed.
    pub fn advance(&mut self, elapsed: Duration) -> TickReport<K> {
        self.advance_with(|timer| timer.advance(elapsed))
    }

    fn advance_with(&mut self, step: impl Fn(&mut Timer<K>) -> bool) -> TickReport<K> {
        let mut report = TickReport::default();
        let mut finished_one_shot = false;

        for timer in self.timers.iter_mut() {
            if !step(timer) {
                continue;
            }

            timer.fired += 1;
            report.completed.push(timer.key.clone());

            let outcome = catch_unwind(AssertUnwindSafe(|| (timer.handler)(&timer.key)));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    warn!(key = ?timer.key, error = %err, "completion handler failed");
                    report.failed.push(timer.key.clone());
                }
                Err(payload) => {
                    error!(
                        key = ?timer.key,
                        panic = panic_message(payload.as_ref()),
                        "completion handler panicked"
                    );
                    report.failed.push(timer.key.clone());
                }
            }

            match timer.mode {
                TimerMode::Repeating => timer.reset(),
                TimerMode::OneShot => finished_one_shot = true,
            }
        }

        if finished_one_shot {
            self.timers
                .retain(|t| !(t.mode == TimerMode::OneShot && t.remaining().is_zero()));
            self.release_if_idle();
        }

        report
    }

    // ─── Queries ────────────────────────────────────────────────────────────

    /// Remaining time for `key`, or `None` if not scheduled
    pub fn remaining_for(&self, key: &K) -> Option<Duration> {
        self.get(key).map(|t| t.remaining())
    }

    /// Remaining time for `key` in seconds, or `None` if not scheduled
    pub fn remaining_secs(&self, key: &K) -> Option<f64> {
        self.remaining_for(key).map(|d| d.as_secs_f64())
    }

    /// Display fill for `key` (1.0 = full, 0.0 = expired), or `None` if not scheduled
    pub fn fill_fraction(&self, key: &K) -> Option<f32> {
        self.get(key).map(|t| t.fill_fraction())
    }

    pub fn state_of(&self, key: &K) -> ScheduleState {
        self.get(key)
            .map(|t| t.state())
            .unwrap_or(ScheduleState::NotScheduled)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &K) -> Option<&Timer<K>> {
        self.timers.iter().find(|t| &t.key == key)
    }

    /// Scheduled keys in processing order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.timers.iter().map(|t| &t.key)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Whether the tick source is currently held
    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub fn tick_source(&self) -> &S {
        &self.tick_source
    }

    fn position(&self, key: &K) -> Option<usize> {
        self.timers.iter().position(|t| &t.key == key)
    }
}

impl<K: std::fmt::Debug, S: TickSource> std::fmt::Debug for CooldownScheduler<K, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CooldownScheduler")
            .field("timers", &self.timers)
            .field("ticking", &self.ticking)
            .finish_non_exhaustive()
    }
}

/// Convert seconds to a `Duration`, rejecting negative, NaN, infinite and overflowing values
pub(crate) fn secs_to_duration(secs: f64) -> Option<Duration> {
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    if secs == 0.0 {
        return Some(Duration::ZERO);
    }
    Duration::try_from_secs_f64(secs).ok()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "<non-string panic payload>"
    }
}
