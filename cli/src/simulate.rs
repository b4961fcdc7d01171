//! Scripted combat for exercising auto-fire from the command line
//!
//! The simulated target becomes selectable after a configurable delay so the
//! skip-then-resume behaviour of auto-fire is visible in the shot log.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use volley_core::{
    AutoFireController, AutoFirePolicy, CombatContext, HandlerError, SlotId, TargetId, Tickable, WeaponProfile,
    WeaponReadiness,
};

/// Target id the simulated enemy is assigned
pub const SIMULATED_TARGET: TargetId = 1;

/// One fired shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotRecord {
    /// Simulation time of the shot
    pub at: Duration,
    pub slot: SlotId,
    pub target: TargetId,
}

/// Combat state driven by the simulation clock
#[derive(Debug)]
pub struct SimulatedCombat {
    clock: Cell<Duration>,
    target_after: Duration,
    target_lost_at: Option<Duration>,
    shots: RefCell<Vec<ShotRecord>>,
}

impl SimulatedCombat {
    pub fn new(target_after: Duration, target_lost_at: Option<Duration>) -> Self {
        Self {
            clock: Cell::new(Duration::ZERO),
            target_after,
            target_lost_at,
            shots: RefCell::new(Vec::new()),
        }
    }

    pub fn now(&self) -> Duration {
        self.clock.get()
    }

    fn advance_clock(&self, elapsed: Duration) {
        self.clock.set(self.clock.get() + elapsed);
    }

    pub fn shots(&self) -> Vec<ShotRecord> {
        self.shots.borrow().clone()
    }
}

impl CombatContext for SimulatedCombat {
    fn weapon_readiness(&self, _slot: SlotId) -> WeaponReadiness {
        WeaponReadiness::Ready
    }

    fn selected_target(&self) -> Option<TargetId> {
        let now = self.now();
        let lost = self.target_lost_at.is_some_and(|at| now >= at);
        (now >= self.target_after && !lost).then_some(SIMULATED_TARGET)
    }

    fn fire(&self, slot: SlotId, target: TargetId) -> Result<(), HandlerError> {
        self.shots.borrow_mut().push(ShotRecord {
            at: self.now(),
            slot,
            target,
        });
        Ok(())
    }
}

/// Controller plus the simulated combat it fires into
pub struct SimulationSession {
    pub combat: Rc<SimulatedCombat>,
    pub controller: AutoFireController<SimulatedCombat>,
    pub weapons: Vec<WeaponProfile>,
}

impl SimulationSession {
    pub fn new(
        combat: SimulatedCombat,
        policy: AutoFirePolicy,
        weapons: Vec<WeaponProfile>,
    ) -> Result<Self, String> {
        let combat = Rc::new(combat);
        let mut controller = AutoFireController::new(Rc::clone(&combat), policy);
        for weapon in &weapons {
            controller
                .enable_profile(weapon)
                .map_err(|e| format!("weapon '{}': {e}", weapon.name))?;
        }
        Ok(Self {
            combat,
            controller,
            weapons,
        })
    }

    /// Advance in fixed steps without waiting on the wall clock
    pub fn run_accelerated(&mut self, total: Duration, step: Duration) -> usize {
        let step = step.max(Duration::from_millis(1));
        let mut completions = 0;
        while self.combat.now() < total {
            completions += self.tick_elapsed(step);
        }
        completions
    }

    pub fn weapon_name(&self, slot: SlotId) -> &str {
        self.weapons
            .iter()
            .find(|w| w.slot == slot)
            .map(|w| w.name.as_str())
            .unwrap_or("?")
    }
}

impl Tickable for SimulationSession {
    fn tick_elapsed(&mut self, elapsed: Duration) -> usize {
        self.combat.advance_clock(elapsed);
        self.controller.tick_elapsed(elapsed)
    }

    fn is_idle(&self) -> bool {
        self.controller.is_idle()
    }
}
