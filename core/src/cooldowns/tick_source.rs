//! Recurring tick sources
//!
//! The scheduler does not own a clock. It tells its tick source when ticks are
//! needed (first timer registered) and when they are not (last timer gone), and
//! the host drives `tick` from whatever periodic callback it has.

use std::cell::Cell;
use std::rc::Rc;

/// Host-side recurring callback the scheduler can acquire and release
pub trait TickSource {
    /// Called when the scheduler goes from idle to having at least one timer
    fn acquire(&mut self);

    /// Called when the last timer is removed
    fn release(&mut self);
}

/// Tick source for hosts that call `tick` themselves (tests, game loops).
/// Records whether ticks are currently wanted.
#[derive(Debug, Default, Clone)]
pub struct ManualTicks {
    running: bool,
    acquisitions: u32,
}

impl ManualTicks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of times the source has been (re)acquired
    pub fn acquisitions(&self) -> u32 {
        self.acquisitions
    }
}

impl TickSource for ManualTicks {
    fn acquire(&mut self) {
        self.running = true;
        self.acquisitions += 1;
    }

    fn release(&mut self) {
        self.running = false;
    }
}

/// Tick source whose running flag is shared with a driver loop.
///
/// Clones observe the same flag, so the driver can hold one handle while the
/// scheduler owns another.
#[derive(Debug, Default, Clone)]
pub struct SharedTickGate {
    running: Rc<Cell<bool>>,
}

impl SharedTickGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }
}

impl TickSource for SharedTickGate {
    fn acquire(&mut self) {
        self.running.set(true);
    }

    fn release(&mut self) {
        self.running.set(false);
    }
}
