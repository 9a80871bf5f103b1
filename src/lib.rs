//! Stamp Rush - a timed paper-stamping reaction minigame core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (paper pipeline, matching, anger, difficulty)
//! - `config`: Data-driven session tuning parameters
//!
//! Rendering, animation playback, menus, audio and high-score storage are
//! external collaborators. They receive requests and notifications through
//! the event queue drained from [`sim::SessionState`] and report animation
//! completion back through [`sim::TickInput`].

pub mod config;
pub mod sim;

pub use config::{ConfigError, RemapPolicy, SessionConfig};
pub use sim::{SessionEvent, SessionState, Slot, StampColor, TickInput, tick};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the demo driver (60 Hz is plenty
    /// for a reaction game)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Distance at which a traveling paper counts as arrived
    pub const ARRIVAL_EPSILON: f32 = 0.1;

    /// Number of colors and input slots (the mapping is a bijection over
    /// these)
    pub const SLOT_COUNT: usize = 4;
}
