//! Error types for cooldown scheduling

use thiserror::Error;

/// Error returned by a completion handler
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Argument errors surfaced synchronously by the scheduler and the auto-fire controller
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchedulerError {
    #[error("timer period must be a positive, finite number of seconds (got {secs})")]
    InvalidPeriod { secs: f64 },

    #[error("elapsed time must be a non-negative, finite number of seconds (got {secs})")]
    InvalidElapsed { secs: f64 },

    #[error("fire rate must be a positive, finite number of shots per second (got {rate})")]
    InvalidFireRate { rate: f64 },
}
