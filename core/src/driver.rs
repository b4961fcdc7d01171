//! Interval driver
//!
//! Feeds measured wall-clock deltas from a tokio `interval` into anything that
//! can be ticked. Runs on the current task; nothing is spawned, so the target
//! does not need to be `Send`.

use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;
use volley_types::SchedulerConfig;

use crate::autofire::{AutoFireController, CombatContext};
use crate::cooldowns::{CooldownScheduler, TickSource};

/// Something advanced by a recurring clock
pub trait Tickable {
    /// Advance by `elapsed`, returning how many timers completed
    fn tick_elapsed(&mut self, elapsed: Duration) -> usize;

    /// True once there is nothing left to tick
    fn is_idle(&self) -> bool;
}

impl<K, S> Tickable for CooldownScheduler<K, S>
where
    K: Clone + PartialEq + std::fmt::Debug,
    S: TickSource,
{
    fn tick_elapsed(&mut self, elapsed: Duration) -> usize {
        self.advance(elapsed).completed.len()
    }

    fn is_idle(&self) -> bool {
        !self.is_ticking()
    }
}

impl<C, S> Tickable for AutoFireController<C, S>
where
    C: CombatContext + 'static,
    S: TickSource,
{
    fn tick_elapsed(&mut self, elapsed: Duration) -> usize {
        self.advance(elapsed).completed.len()
    }

    fn is_idle(&self) -> bool {
        !self.scheduler().is_ticking()
    }
}

/// Totals for one driver run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DriverSummary {
    pub ticks: u64,
    pub completions: usize,
    pub elapsed: Duration,
}

/// Drives a `Tickable` from a fixed-period tokio interval
#[derive(Debug, Clone, Copy)]
pub struct IntervalDriver {
    period: Duration,
}

impl IntervalDriver {
    /// A zero period is raised to one millisecond
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
        }
    }

    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self::new(Duration::from_millis(config.tick_interval_ms))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Tick `target` until `total` has elapsed
    pub async fn run_for<T: Tickable>(&self, target: &mut T, total: Duration) -> DriverSummary {
        self.run(target, total, false).await
    }

    /// Tick `target` until it goes idle or `limit` has elapsed
    pub async fn run_until_idle<T: Tickable>(&self, target: &mut T, limit: Duration) -> DriverSummary {
        self.run(target, limit, true).await
    }

    async fn run<T: Tickable>(&self, target: &mut T, limit: Duration, stop_when_idle: bool) -> DriverSummary {
        let mut summary = DriverSummary::default();
        if stop_when_idle && target.is_idle() {
            return summary;
        }

        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // First tick completes immediately
        interval.tick().await;
        let started = Instant::now();
        let mut last = started;

        loop {
            interval.tick().await;
            let now = Instant::now();
            let elapsed = now - last;
            last = now;

            summary.ticks += 1;
            summary.completions += target.tick_elapsed(elapsed);
            summary.elapsed = now - started;

            if summary.elapsed >= limit || (stop_when_idle && target.is_idle()) {
                break;
            }
        }

        debug!(
            ticks = summary.ticks,
            completions = summary.completions,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "driver finished"
        );
        summary
    }
}
