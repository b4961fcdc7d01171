pub mod commands;
pub mod logging;
pub mod simulate;

pub use simulate::{SimulatedCombat, SimulationSession};
