//! Weapon auto-fire controller
//!
//! Owns one repeating cooldown per weapon slot with auto-fire enabled. Each
//! time a slot's cooldown elapses the slot fires if a target is selected and
//! the weapon is ready; otherwise the shot is skipped and the cooldown simply
//! restarts, so firing resumes on its own once a target is (re)selected.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use hashbrown::HashMap;
use tracing::debug;
use volley_types::{AutoFirePolicy, SlotId, WeaponProfile};

use crate::cooldowns::{
    CooldownScheduler, HandlerError, ManualTicks, SchedulerError, TickReport, TickSource, TimerMode,
    secs_to_duration,
};

use super::{CombatContext, FireInterval};

/// Per-slot auto-fire state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotPhase {
    #[default]
    Disabled,
    /// Enabled, counting down to the next shot
    Waiting,
    /// Enabled, fired on the most recent tick
    Fired,
}

/// Counters for one slot since auto-fire was enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlotStats {
    pub shots: u64,
    pub skipped_no_target: u64,
    pub skipped_not_ready: u64,
    /// Fire actions that returned an error
    pub failures: u64,
}

/// Shared between the controller and the slot's completion handler
#[derive(Debug, Default)]
struct SlotTracker {
    phase: Cell<SlotPhase>,
    stats: Cell<SlotStats>,
}

impl SlotTracker {
    fn update(&self, f: impl FnOnce(&mut SlotStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

/// Fires weapons automatically whenever their cooldown elapses and a target exists
pub struct AutoFireController<C: CombatContext + 'static, S: TickSource = ManualTicks> {
    scheduler: CooldownScheduler<SlotId, S>,
    combat: Rc<C>,
    policy: AutoFirePolicy,
    slots: HashMap<SlotId, Rc<SlotTracker>>,
}

impl<C: CombatContext + 'static> AutoFireController<C, ManualTicks> {
    pub fn new(combat: Rc<C>, policy: AutoFirePolicy) -> Self {
        Self::with_tick_source(combat, policy, ManualTicks::new())
    }
}

impl<C: CombatContext + 'static, S: TickSource> AutoFireController<C, S> {
    pub fn with_tick_source(combat: Rc<C>, policy: AutoFirePolicy, tick_source: S) -> Self {
        Self {
            scheduler: CooldownScheduler::with_tick_source(tick_source),
            combat,
            policy,
            slots: HashMap::new(),
        }
    }

    /// Enable auto-fire for `slot`, returning the re-fire interval used.
    ///
    /// Enabling an already enabled slot restarts its cooldown with the new rate;
    /// the slot's counters are kept.
    pub fn enable(&mut self, slot: SlotId, fire_rate: f64) -> Result<Duration, SchedulerError> {
        let period = self.policy.fire_interval(fire_rate)?;

        let tracker = self
            .slots
            .get(&slot)
            .cloned()
            .unwrap_or_else(|| Rc::new(SlotTracker::default()));

        let handler = slot_handler(Rc::clone(&self.combat), Rc::clone(&tracker));
        self.scheduler
            .start_with_period(slot, period, TimerMode::Repeating, handler)?;

        tracker.phase.set(SlotPhase::Waiting);
        self.slots.insert(slot, tracker);

        debug!(slot, fire_rate, period_ms = period.as_millis() as u64, "auto-fire enabled");
        Ok(period)
    }

    /// Enable auto-fire using a configured weapon's slot and fire rate
    pub fn enable_profile(&mut self, weapon: &WeaponProfile) -> Result<Duration, SchedulerError> {
        self.enable(weapon.slot, weapon.fire_rate)
    }

    /// Disable auto-fire for `slot`. Returns false if it was not enabled.
    pub fn disable(&mut self, slot: SlotId) -> bool {
        let Some(tracker) = self.slots.remove(&slot) else {
            return false;
        };
        tracker.phase.set(SlotPhase::Disabled);
        self.scheduler.stop(&slot);
        debug!(slot, "auto-fire disabled");
        true
    }

    /// Disable every slot (combat session ended or owner torn down)
    pub fn disable_all(&mut self) {
        for tracker in self.slots.values() {
            tracker.phase.set(SlotPhase::Disabled);
        }
        self.slots.clear();
        self.scheduler.clear();
    }

    /// Advance every enabled slot by `elapsed_secs`
    pub fn tick(&mut self, elapsed_secs: f64) -> Result<TickReport<SlotId>, SchedulerError> {
        if secs_to_duration(elapsed_secs).is_none() {
            return Err(SchedulerError::InvalidElapsed { secs: elapsed_secs });
        }
        self.settle_fired();
        self.scheduler.tick(elapsed_secs)
    }

    pub fn advance(&mut self, elapsed: Duration) -> TickReport<SlotId> {
        self.settle_fired();
        self.scheduler.advance(elapsed)
    }

    /// Slots that fired on the previous tick go back to waiting
    fn settle_fired(&self) {
        for tracker in self.slots.values() {
            if tracker.phase.get() == SlotPhase::Fired {
                tracker.phase.set(SlotPhase::Waiting);
            }
        }
    }

    // ─── Queries ────────────────────────────────────────────────────────────

    pub fn phase(&self, slot: SlotId) -> SlotPhase {
        self.slots
            .get(&slot)
            .map(|t| t.phase.get())
            .unwrap_or(SlotPhase::Disabled)
    }

    pub fn stats(&self, slot: SlotId) -> Option<SlotStats> {
        self.slots.get(&slot).map(|t| t.stats.get())
    }

    pub fn is_enabled(&self, slot: SlotId) -> bool {
        self.slots.contains_key(&slot)
    }

    /// Time until `slot` next attempts to fire
    pub fn remaining_for(&self, slot: SlotId) -> Option<Duration> {
        self.scheduler.remaining_for(&slot)
    }

    /// Enabled slots in the order they are processed each tick
    pub fn enabled_slots(&self) -> Vec<SlotId> {
        self.scheduler.keys().copied().collect()
    }

    pub fn policy(&self) -> &AutoFirePolicy {
        &self.policy
    }

    /// Replace the policy. Only affects slots enabled afterwards.
    pub fn set_policy(&mut self, policy: AutoFirePolicy) {
        self.policy = policy;
    }

    pub fn combat(&self) -> &C {
        &self.combat
    }

    pub fn scheduler(&self) -> &CooldownScheduler<SlotId, S> {
        &self.scheduler
    }
}

/// Completion handler for one slot: fire at the selected target if the weapon is ready
fn slot_handler<C: CombatContext + 'static>(
    combat: Rc<C>,
    tracker: Rc<SlotTracker>,
) -> impl FnMut(&SlotId) -> Result<(), HandlerError> + 'static {
    move |slot: &SlotId| {
        let slot = *slot;

        let Some(target) = combat.selected_target() else {
            tracker.update(|s| s.skipped_no_target += 1);
            return Ok(());
        };

        let readiness = combat.weapon_readiness(slot);
        if !readiness.is_ready() {
            debug!(slot, ?readiness, "auto-fire skipped, weapon not ready");
            tracker.update(|s| s.skipped_not_ready += 1);
            return Ok(());
        }

        match combat.fire(slot, target) {
            Ok(()) => {
                tracker.update(|s| s.shots += 1);
                tracker.phase.set(SlotPhase::Fired);
                Ok(())
            }
            Err(err) => {
                tracker.update(|s| s.failures += 1);
                Err(err)
            }
        }
    }
}
