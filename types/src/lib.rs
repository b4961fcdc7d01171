//! Shared configuration types for volley
//!
//! This crate contains serializable configuration types that are shared between
//! the scheduling library (volley-core) and its hosts (the CLI, UI bindings).

use serde::{Deserialize, Serialize};

/// Identifier of a weapon slot on a ship loadout
pub type SlotId = u8;

// ─────────────────────────────────────────────────────────────────────────────
// Scheduler Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Settings for the host clock that drives the cooldown scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Period of the recurring tick source in milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_tick_interval_ms() -> u64 {
    50
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Auto-Fire Policy
// ─────────────────────────────────────────────────────────────────────────────

/// Converts a weapon's fire rate into a re-fire interval.
///
/// The interval is `max(minimum_interval, 1 / fire_rate - safety_margin)`.
/// The margin biases auto-fire slightly fast so host timing jitter does not
/// cause systematic under-firing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoFirePolicy {
    /// Lower bound on the re-fire interval in milliseconds
    #[serde(default = "default_minimum_interval_ms")]
    pub minimum_interval_ms: u64,
    /// Subtracted from the nominal interval in milliseconds
    #[serde(default = "default_safety_margin_ms")]
    pub safety_margin_ms: u64,
}

fn default_minimum_interval_ms() -> u64 {
    50
}

fn default_safety_margin_ms() -> u64 {
    50
}

impl Default for AutoFirePolicy {
    fn default() -> Self {
        Self {
            minimum_interval_ms: default_minimum_interval_ms(),
            safety_margin_ms: default_safety_margin_ms(),
        }
    }
}

impl AutoFirePolicy {
    /// Policy with no margin and no floor: interval is exactly `1 / fire_rate`
    pub fn exact() -> Self {
        Self {
            minimum_interval_ms: 0,
            safety_margin_ms: 0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Weapon Profiles
// ─────────────────────────────────────────────────────────────────────────────

/// A weapon mounted in a slot, as configured by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponProfile {
    pub slot: SlotId,
    /// Display name ("Laser", "Railgun", ...)
    pub name: String,
    /// Shots per second
    pub fire_rate: f64,
    /// Enable auto-fire for this slot when a session starts
    #[serde(default)]
    pub auto_fire: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolleyConfig {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub auto_fire: AutoFirePolicy,
    #[serde(default)]
    pub weapons: Vec<WeaponProfile>,
}

impl VolleyConfig {
    /// Look up the weapon mounted in `slot`
    pub fn weapon(&self, slot: SlotId) -> Option<&WeaponProfile> {
        self.weapons.iter().find(|w| w.slot == slot)
    }

    /// Weapons flagged to start with auto-fire enabled
    pub fn auto_fire_weapons(&self) -> impl Iterator<Item = &WeaponProfile> {
        self.weapons.iter().filter(|w| w.auto_fire)
    }
}
