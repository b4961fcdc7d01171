pub mod autofire;
pub mod config;
pub mod cooldowns;
pub mod driver;

// Re-exports for convenience
pub use autofire::{
    AutoFireController, CombatContext, FireInterval, SlotPhase, SlotStats, TargetId,
    WeaponReadiness,
};
pub use config::{ConfigError, ConfigExt};
pub use cooldowns::{
    CooldownScheduler, HandlerError, ManualTicks, ScheduleState, SchedulerError, SharedTickGate,
    TickReport, TickSource, Timer, TimerMode, format_countdown,
};
pub use driver::{DriverSummary, IntervalDriver, Tickable};
pub use volley_types::{AutoFirePolicy, SchedulerConfig, SlotId, VolleyConfig, WeaponProfile};
