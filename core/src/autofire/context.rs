//! Capabilities the auto-fire controller borrows from the host game state

use volley_types::SlotId;

use crate::cooldowns::HandlerError;

/// Identifier of a selectable target
pub type TargetId = i64;

/// Whether a weapon can fire right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponReadiness {
    Ready,
    Cooling,
    Overheated,
    OutOfAmmo,
    OutOfEnergy,
}

impl WeaponReadiness {
    pub fn is_ready(self) -> bool {
        self == WeaponReadiness::Ready
    }
}

/// Game-state queries and the fire action, supplied by the host.
///
/// All methods take `&self`; hosts keep their state behind `Cell`/`RefCell`
/// since everything runs on one thread.
pub trait CombatContext {
    fn weapon_readiness(&self, slot: SlotId) -> WeaponReadiness;

    /// Currently selected target, if any
    fn selected_target(&self) -> Option<TargetId>;

    /// Fire the weapon in `slot` at `target`
    fn fire(&self, slot: SlotId, target: TargetId) -> Result<(), HandlerError>;
}
