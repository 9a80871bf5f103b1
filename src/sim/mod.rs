//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only, no wall clock
//! - Seeded RNG only
//! - Single-threaded cooperative tick; blocking animations are modeled as
//!   outstanding tasks completed via [`TickInput`] flags
//! - No rendering or platform dependencies

pub mod anger;
pub mod difficulty;
pub mod mapping;
pub mod queue;
pub mod state;
pub mod tick;

pub use anger::{AngerMeter, AngerTransition};
pub use difficulty::{DifficultyParams, DifficultyRamp};
pub use mapping::MappingTable;
pub use queue::{Paper, PaperQueue, PaperState};
pub use state::{BlockingTask, Outcome, SessionEvent, SessionPhase, SessionState, Slot, StampColor};
pub use tick::{TickInput, tick};
