//! Session tuning parameters
//!
//! All named numeric knobs the simulation reads, validated once at session
//! construction and optionally loaded from a JSON file by the demo driver.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::StampColor;

/// When a pending mapping shuffle is actually triggered.
///
/// Source revisions of the game disagree on this, so it is a policy knob
/// rather than a hard-coded rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RemapPolicy {
    /// Shuffle after every incorrect match or timeout
    #[default]
    EveryIncorrect,
    /// Shuffle after every `n` correct matches since the last shuffle
    EveryNCorrect(u32),
}

/// Configuration errors, surfaced at construction time only
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{name}` must be positive (got {value})")]
    NonPositive { name: &'static str, value: f32 },
    #[error("`{name}` step must not be negative (got {value})")]
    NegativeStep { name: &'static str, value: f32 },
    #[error("`{name}` bounds inverted: {lo} > {hi}")]
    InvertedBounds {
        name: &'static str,
        lo: f32,
        hi: f32,
    },
    #[error("`{name}` must be at least 1")]
    ZeroThreshold { name: &'static str },
    #[error("initial mapping does not assign each color to exactly one slot")]
    NonBijectiveMapping,
    #[error("spawn point and destination coincide")]
    DegeneratePath,
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Session tuning parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    // === Paper travel ===
    /// Where papers appear
    pub spawn_point: Vec2,
    /// Where papers stop and await input
    pub destination: Vec2,
    /// Travel speed at session start (units/sec)
    pub travel_speed_start: f32,
    /// Travel speed ceiling
    pub travel_speed_max: f32,
    /// Travel speed increase per ramp step
    pub travel_speed_step: f32,

    // === Response window ===
    /// Seconds the player has to answer an arrived paper, at session start
    pub response_window_start: f32,
    /// Response window floor
    pub response_window_min: f32,
    /// Response window shrink per ramp step
    pub response_window_step: f32,

    // === Remap animation ===
    /// Seconds the shuffle animation takes, at session start
    pub remap_duration_start: f32,
    /// Remap duration floor
    pub remap_duration_min: f32,
    /// Remap duration shrink per ramp step
    pub remap_duration_step: f32,

    // === Resolve (stamp) animation ===
    /// Playback rate hint for the stamp animation, at session start
    pub resolve_anim_speed_start: f32,
    /// Playback rate ceiling
    pub resolve_anim_speed_max: f32,
    /// Playback rate increase per ramp step
    pub resolve_anim_speed_step: f32,

    // === Difficulty ramp ===
    /// Seconds of session time between ramp steps
    pub ramp_interval: f32,

    // === Anger / escalation ===
    /// Anger level that ends the session
    pub max_anger: u8,
    /// Consecutive correct matches needed to de-escalate one level
    pub required_streak_to_calm: u32,
    /// When escalation triggers a mapping shuffle
    pub remap_policy: RemapPolicy,

    // === Session ===
    /// Countdown before the first paper spawns (seconds)
    pub lead_in: f32,
    /// Slot-indexed initial color assignment (Up, Down, Left, Right)
    pub initial_mapping: [StampColor; 4],
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            spawn_point: Vec2::new(0.0, 6.0),
            destination: Vec2::ZERO,
            travel_speed_start: 2.0,
            travel_speed_max: 6.0,
            travel_speed_step: 0.25,

            response_window_start: 2.0,
            response_window_min: 0.75,
            response_window_step: 0.1,

            remap_duration_start: 1.0,
            remap_duration_min: 0.4,
            remap_duration_step: 0.05,

            resolve_anim_speed_start: 1.0,
            resolve_anim_speed_max: 2.0,
            resolve_anim_speed_step: 0.1,

            ramp_interval: 10.0,

            max_anger: 4,
            required_streak_to_calm: 3,
            remap_policy: RemapPolicy::EveryIncorrect,

            lead_in: 3.0,
            initial_mapping: [
                StampColor::Red,
                StampColor::Blue,
                StampColor::Green,
                StampColor::Yellow,
            ],
        }
    }
}

impl SessionConfig {
    /// Check every invariant the simulation relies on. Called once by
    /// `SessionState::new`; nothing downstream re-validates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
            if value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::NonPositive { name, value })
            }
        }
        fn step(name: &'static str, value: f32) -> Result<(), ConfigError> {
            if value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::NegativeStep { name, value })
            }
        }
        fn ordered(name: &'static str, lo: f32, hi: f32) -> Result<(), ConfigError> {
            if lo <= hi {
                Ok(())
            } else {
                Err(ConfigError::InvertedBounds { name, lo, hi })
            }
        }

        positive("travel_speed_start", self.travel_speed_start)?;
        positive("response_window_start", self.response_window_start)?;
        positive("response_window_min", self.response_window_min)?;
        positive("remap_duration_start", self.remap_duration_start)?;
        positive("remap_duration_min", self.remap_duration_min)?;
        positive("resolve_anim_speed_start", self.resolve_anim_speed_start)?;
        positive("ramp_interval", self.ramp_interval)?;

        step("travel_speed_step", self.travel_speed_step)?;
        step("response_window_step", self.response_window_step)?;
        step("remap_duration_step", self.remap_duration_step)?;
        step("resolve_anim_speed_step", self.resolve_anim_speed_step)?;

        ordered(
            "travel_speed",
            self.travel_speed_start,
            self.travel_speed_max,
        )?;
        ordered(
            "response_window",
            self.response_window_min,
            self.response_window_start,
        )?;
        ordered(
            "remap_duration",
            self.remap_duration_min,
            self.remap_duration_start,
        )?;
        ordered(
            "resolve_anim_speed",
            self.resolve_anim_speed_start,
            self.resolve_anim_speed_max,
        )?;

        if self.max_anger == 0 {
            return Err(ConfigError::ZeroThreshold { name: "max_anger" });
        }
        if self.required_streak_to_calm == 0 {
            return Err(ConfigError::ZeroThreshold {
                name: "required_streak_to_calm",
            });
        }
        if let RemapPolicy::EveryNCorrect(0) = self.remap_policy {
            return Err(ConfigError::ZeroThreshold {
                name: "remap_policy.EveryNCorrect",
            });
        }
        if self.lead_in < 0.0 {
            return Err(ConfigError::NegativeStep {
                name: "lead_in",
                value: self.lead_in,
            });
        }

        let mut seen = [false; 4];
        for color in self.initial_mapping {
            let idx = color as usize;
            if seen[idx] {
                return Err(ConfigError::NonBijectiveMapping);
            }
            seen[idx] = true;
        }

        if self.spawn_point.distance(self.destination) <= crate::consts::ARRIVAL_EPSILON {
            return Err(ConfigError::DegeneratePath);
        }

        Ok(())
    }

    /// Load and validate a config from a JSON file
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!("Loaded session config from {}", path.display());
        Ok(config)
    }

    /// Save the config as pretty JSON
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Session config saved to {}", path.display());
        Ok(())
    }
}
