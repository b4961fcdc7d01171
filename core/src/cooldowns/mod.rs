//! Cooldown scheduling
//!
//! This module provides:
//! - **Timers**: named countdowns, one-shot or repeating
//! - **Scheduler**: advances all timers on one logical clock and fires
//!   completion handlers in isolation from each other
//! - **Tick sources**: the host-side periodic callback the scheduler acquires
//!   while it has timers and releases when it becomes idle
//!
//! # Repeating timers
//!
//! A repeating timer that matures is reset to exactly its period. Any overshoot
//! from the tick that matured it is discarded, and a single tick fires a timer
//! at most once.

mod error;
mod format;
mod scheduler;
mod tick_source;
mod timer;


pub use error::{HandlerError, SchedulerError};
pub use format::format_countdown;
pub use scheduler::{CooldownScheduler, TickReport};
pub(crate) use scheduler::secs_to_duration;
pub use tick_source::{ManualTicks, SharedTickGate, TickSource};
pub use timer::{CompletionHandler, ScheduleState, Timer, TimerMode};
