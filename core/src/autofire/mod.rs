//! Weapon auto-fire
//!
//! Composes a `CooldownScheduler` keyed by weapon slot with host-supplied
//! combat state. Per-slot lifecycle:
//!
//! `Disabled -> Waiting -> Fired -> Waiting -> ... -> Disabled`
//!
//! A fire-rate change while enabled is not picked up automatically; callers
//! disable and re-enable the slot with the new rate.

mod context;
mod controller;
mod policy;

#[cfg(test)]
mod controller_tests;

pub use context::{CombatContext, TargetId, WeaponReadiness};
pub use controller::{AutoFireController, SlotPhase, SlotStats};
pub use policy::FireInterval;
