//! Tests for AutoFireController
//!
//! Drives the controller with exact elapsed values against a fake combat
//! context and checks which shots were fired.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use hashbrown::HashMap;
use volley_types::{AutoFirePolicy, SlotId, WeaponProfile};

use crate::cooldowns::{HandlerError, SchedulerError};

use super::{AutoFireController, CombatContext, SlotPhase, TargetId, WeaponReadiness};

// ═══════════════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct FakeCombat {
    target: Cell<Option<TargetId>>,
    readiness: RefCell<HashMap<SlotId, WeaponReadiness>>,
    shots: RefCell<Vec<(SlotId, TargetId)>>,
    jammed: Cell<bool>,
}

impl FakeCombat {
    fn with_target(target: TargetId) -> Rc<Self> {
        let combat = Self::default();
        combat.target.set(Some(target));
        Rc::new(combat)
    }

    fn set_readiness(&self, slot: SlotId, readiness: WeaponReadiness) {
        self.readiness.borrow_mut().insert(slot, readiness);
    }

    fn shots_from(&self, slot: SlotId) -> usize {
        self.shots.borrow().iter().filter(|(s, _)| *s == slot).count()
    }
}

impl CombatContext for FakeCombat {
    fn weapon_readiness(&self, slot: SlotId) -> WeaponReadiness {
        self.readiness
            .borrow()
            .get(&slot)
            .copied()
            .unwrap_or(WeaponReadiness::Ready)
    }

    fn selected_target(&self) -> Option<TargetId> {
        self.target.get()
    }

    fn fire(&self, slot: SlotId, target: TargetId) -> Result<(), HandlerError> {
        if self.jammed.get() {
            return Err("weapon jammed".into());
        }
        self.shots.borrow_mut().push((slot, target));
        Ok(())
    }
}

/// Controller with exact intervals (no margin, no floor) so periods are `1 / rate`
fn exact_controller(combat: &Rc<FakeCombat>) -> AutoFireController<FakeCombat> {
    AutoFireController::new(Rc::clone(combat), AutoFirePolicy::exact())
}

// ═══════════════════════════════════════════════════════════════════════════
// Enable / Disable
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_enable_uses_policy_interval() {
    let combat = FakeCombat::with_target(7);
    let mut ctrl = AutoFireController::new(Rc::clone(&combat), AutoFirePolicy::default());

    let period = ctrl.enable(1, 2.0).unwrap();

    assert_eq!(period, Duration::from_millis(450));
    assert_eq!(ctrl.remaining_for(1), Some(Duration::from_millis(450)));
    assert_eq!(ctrl.phase(1), SlotPhase::Waiting);
    assert!(ctrl.scheduler().is_ticking());
}

#[test]
fn test_invalid_fire_rate_leaves_slot_disabled() {
    let combat = FakeCombat::with_target(7);
    let mut ctrl = exact_controller(&combat);

    let err = ctrl.enable(1, 0.0).unwrap_err();

    assert_eq!(err, SchedulerError::InvalidFireRate { rate: 0.0 });
    assert!(!ctrl.is_enabled(1));
    assert_eq!(ctrl.phase(1), SlotPhase::Disabled);
    assert!(!ctrl.scheduler().is_ticking());
}

#[test]
fn test_disable_never_enabled_is_a_no_op() {
    let combat = FakeCombat::with_target(7);
    let mut ctrl = exact_controller(&combat);

    assert!(!ctrl.disable(3));
    assert_eq!(ctrl.phase(3), SlotPhase::Disabled);
}

#[test]
fn test_disabled_slot_stops_firing() {
    let combat = FakeCombat::with_target(7);
    let mut ctrl = exact_controller(&combat);
    ctrl.enable(1, 2.0).unwrap();

    ctrl.tick(0.5).unwrap();
    assert_eq!(combat.shots_from(1), 1);

    assert!(ctrl.disable(1));
    for _ in 0..10 {
        ctrl.tick(0.5).unwrap();
    }

    assert_eq!(combat.shots_from(1), 1);
    assert_eq!(ctrl.phase(1), SlotPhase::Disabled);
    assert!(!ctrl.scheduler().is_ticking());
}

#[test]
fn test_disable_all_tears_down_every_slot() {
    let combat = FakeCombat::with_target(7);
    let mut ctrl = exact_controller(&combat);
    ctrl.enable(1, 2.0).unwrap();
    ctrl.enable(2, 4.0).unwrap();

    ctrl.disable_all();
    ctrl.tick(5.0).unwrap();

    assert!(combat.shots.borrow().is_empty());
    assert!(ctrl.enabled_slots().is_empty());
    assert!(!ctrl.scheduler().tick_source().is_running());
}

// ═══════════════════════════════════════════════════════════════════════════
// Firing
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_fires_at_selected_target_every_interval() {
    let combat = FakeCombat::with_target(42);
    let mut ctrl = exact_controller(&combat);
    ctrl.enable(1, 4.0).unwrap();

    for _ in 0..8 {
        ctrl.tick(0.125).unwrap();
    }

    // 1s at 4 shots/s
    assert_eq!(*combat.shots.borrow(), vec![(1, 42); 4]);
    assert_eq!(ctrl.stats(1).map(|s| s.shots), Some(4));
}

#[test]
fn test_half_interval_ticks_fire_every_interval() {
    let combat = FakeCombat::with_target(42);
    let mut ctrl = exact_controller(&combat);
    ctrl.enable(1, 7.0).unwrap();
    let interval = 7.0_f64.recip();

    for shot in 1..=3 {
        ctrl.tick(interval / 2.0).unwrap();
        assert_eq!(combat.shots_from(1), shot - 1);
        ctrl.tick(interval / 2.0).unwrap();
        assert_eq!(combat.shots_from(1), shot);
    }
}

#[test]
fn test_phase_cycles_between_waiting_and_fired() {
    let combat = FakeCombat::with_target(42);
    let mut ctrl = exact_controller(&combat);
    ctrl.enable(1, 2.0).unwrap();

    ctrl.tick(0.25).unwrap();
    assert_eq!(ctrl.phase(1), SlotPhase::Waiting);

    ctrl.tick(0.25).unwrap();
    assert_eq!(ctrl.phase(1), SlotPhase::Fired);

    ctrl.tick(0.25).unwrap();
    assert_eq!(ctrl.phase(1), SlotPhase::Waiting);
}

#[test]
fn test_no_target_skips_and_resumes_without_reenable() {
    let combat = Rc::new(FakeCombat::default());
    let mut ctrl = exact_controller(&combat);
    ctrl.enable(1, 2.0).unwrap();

    ctrl.tick(0.5).unwrap();
    ctrl.tick(0.5).unwrap();
    assert_eq!(combat.shots_from(1), 0);
    assert_eq!(ctrl.phase(1), SlotPhase::Waiting);
    assert_eq!(ctrl.remaining_for(1), Some(Duration::from_millis(500)));

    combat.target.set(Some(9));
    ctrl.tick(0.5).unwrap();

    assert_eq!(*combat.shots.borrow(), vec![(1, 9)]);
    let stats = ctrl.stats(1).unwrap();
    assert_eq!(stats.skipped_no_target, 2);
    assert_eq!(stats.shots, 1);
}

#[test]
fn test_weapon_not_ready_skips_shot() {
    let combat = FakeCombat::with_target(42);
    let mut ctrl = exact_controller(&combat);
    ctrl.enable(1, 2.0).unwrap();

    for readiness in [
        WeaponReadiness::Cooling,
        WeaponReadiness::Overheated,
        WeaponReadiness::OutOfAmmo,
        WeaponReadiness::OutOfEnergy,
    ] {
        combat.set_readiness(1, readiness);
        ctrl.tick(0.5).unwrap();
    }
    assert_eq!(combat.shots_from(1), 0);
    assert_eq!(ctrl.stats(1).map(|s| s.skipped_not_ready), Some(4));

    combat.set_readiness(1, WeaponReadiness::Ready);
    ctrl.tick(0.5).unwrap();
    assert_eq!(combat.shots_from(1), 1);
}

#[test]
fn test_slots_fire_independently() {
    let combat = FakeCombat::with_target(42);
    let mut ctrl = exact_controller(&combat);
    ctrl.enable(1, 4.0).unwrap();
    ctrl.enable(2, 1.0).unwrap();

    for _ in 0..4 {
        ctrl.tick(0.25).unwrap();
    }

    assert_eq!(combat.shots_from(1), 4);
    assert_eq!(combat.shots_from(2), 1);
    assert_eq!(ctrl.enabled_slots(), vec![1, 2]);
}

#[test]
fn test_failed_fire_is_isolated_and_counted() {
    let combat = FakeCombat::with_target(42);
    let mut ctrl = exact_controller(&combat);
    ctrl.enable(1, 2.0).unwrap();
    ctrl.enable(2, 2.0).unwrap();

    combat.jammed.set(true);
    let report = ctrl.tick(0.5).unwrap();

    assert_eq!(report.failed, vec![1, 2]);
    assert_eq!(ctrl.stats(1).map(|s| s.failures), Some(1));
    assert_eq!(ctrl.phase(1), SlotPhase::Waiting);

    // Still enabled; fires once the weapon clears
    combat.jammed.set(false);
    ctrl.tick(0.5).unwrap();
    assert_eq!(combat.shots_from(1), 1);
    assert_eq!(combat.shots_from(2), 1);
}

#[test]
fn test_reenable_with_new_rate_replaces_interval() {
    let combat = FakeCombat::with_target(42);
    let mut ctrl = exact_controller(&combat);
    ctrl.enable(1, 1.0).unwrap();
    ctrl.tick(0.5).unwrap();

    ctrl.disable(1);
    ctrl.enable(1, 4.0).unwrap();

    assert_eq!(ctrl.remaining_for(1), Some(Duration::from_millis(250)));
    ctrl.tick(0.25).unwrap();
    assert_eq!(combat.shots_from(1), 1);
}

#[test]
fn test_enable_profile_uses_slot_and_rate() {
    let combat = FakeCombat::with_target(42);
    let mut ctrl = exact_controller(&combat);
    let railgun = WeaponProfile {
        slot: 3,
        name: "Railgun".to_string(),
        fire_rate: 0.5,
        auto_fire: true,
    };

    let period = ctrl.enable_profile(&railgun).unwrap();

    assert_eq!(period, Duration::from_secs(2));
    assert!(ctrl.is_enabled(3));
}

#[test]
fn test_negative_elapsed_rejected() {
    let combat = FakeCombat::with_target(42);
    let mut ctrl = exact_controller(&combat);
    ctrl.enable(1, 2.0).unwrap();

    assert!(matches!(
        ctrl.tick(-1.0),
        Err(SchedulerError::InvalidElapsed { .. })
    ));
    assert_eq!(ctrl.remaining_for(1), Some(Duration::from_millis(500)));
}
