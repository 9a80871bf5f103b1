//! Difficulty ramp
//!
//! A pure function of elapsed session time. Every `interval` seconds each
//! parameter takes one step toward its bound and is clamped there; anger
//! and score have no influence. Feeding the same elapsed time always
//! yields the same parameters, which is what makes the ramp testable.

use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;

/// The parameters every other component reads for the current moment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParams {
    /// Paper travel speed (units/sec)
    pub travel_speed: f32,
    /// Seconds the player has to answer an arrived paper
    pub response_window: f32,
    /// Seconds the shuffle animation takes
    pub remap_duration: f32,
    /// Playback rate hint for the stamp animation
    pub resolve_anim_speed: f32,
}

#[derive(Debug, Clone)]
pub struct DifficultyRamp {
    interval: f32,
    speed_start: f32,
    speed_max: f32,
    speed_step: f32,
    window_start: f32,
    window_min: f32,
    window_step: f32,
    remap_start: f32,
    remap_min: f32,
    remap_step: f32,
    anim_start: f32,
    anim_max: f32,
    anim_step: f32,
}

impl DifficultyRamp {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            interval: config.ramp_interval,
            speed_start: config.travel_speed_start,
            speed_max: config.travel_speed_max,
            speed_step: config.travel_speed_step,
            window_start: config.response_window_start,
            window_min: config.response_window_min,
            window_step: config.response_window_step,
            remap_start: config.remap_duration_start,
            remap_min: config.remap_duration_min,
            remap_step: config.remap_duration_step,
            anim_start: config.resolve_anim_speed_start,
            anim_max: config.resolve_anim_speed_max,
            anim_step: config.resolve_anim_speed_step,
        }
    }

    /// Parameters after `elapsed` seconds of session time
    pub fn params_at(&self, elapsed: f32) -> DifficultyParams {
        let steps = (elapsed / self.interval).floor().max(0.0);
        DifficultyParams {
            travel_speed: (self.speed_start + steps * self.speed_step).min(self.speed_max),
            response_window: (self.window_start - steps * self.window_step).max(self.window_min),
            remap_duration: (self.remap_start - steps * self.remap_step).max(self.remap_min),
            resolve_anim_speed: (self.anim_start + steps * self.anim_step).min(self.anim_max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ramp() -> DifficultyRamp {
        DifficultyRamp::from_config(&SessionConfig::default())
    }

    #[test]
    fn test_start_params_match_config() {
        let config = SessionConfig::default();
        let params = ramp().params_at(0.0);
        assert_eq!(params.travel_speed, config.travel_speed_start);
        assert_eq!(params.response_window, config.response_window_start);
        assert_eq!(params.remap_duration, config.remap_duration_start);
        assert_eq!(params.resolve_anim_speed, config.resolve_anim_speed_start);
    }

    #[test]
    fn test_one_step_per_interval() {
        let config = SessionConfig::default();
        let ramp = ramp();
        let before = ramp.params_at(config.ramp_interval - 0.01);
        let after = ramp.params_at(config.ramp_interval + 0.01);
        assert_eq!(before.travel_speed, config.travel_speed_start);
        assert_eq!(
            after.travel_speed,
            config.travel_speed_start + config.travel_speed_step
        );
        assert_eq!(
            after.response_window,
            config.response_window_start - config.response_window_step
        );
    }

    #[test]
    fn test_saturates_at_bounds() {
        let config = SessionConfig::default();
        let params = ramp().params_at(1_000_000.0);
        assert_eq!(params.travel_speed, config.travel_speed_max);
        assert_eq!(params.response_window, config.response_window_min);
        assert_eq!(params.remap_duration, config.remap_duration_min);
        assert_eq!(params.resolve_anim_speed, config.resolve_anim_speed_max);
    }

    proptest! {
        #[test]
        fn prop_monotone_and_bounded(times in proptest::collection::vec(0.0f32..10_000.0, 1..64)) {
            let config = SessionConfig::default();
            let ramp = ramp();
            let mut sorted = times.clone();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

            let mut prev = ramp.params_at(0.0);
            for t in sorted {
                let p = ramp.params_at(t);
                // Monotone toward the bound
                prop_assert!(p.travel_speed >= prev.travel_speed);
                prop_assert!(p.response_window <= prev.response_window);
                prop_assert!(p.remap_duration <= prev.remap_duration);
                prop_assert!(p.resolve_anim_speed >= prev.resolve_anim_speed);
                // Never outside the configured bounds
                prop_assert!(p.travel_speed >= config.travel_speed_start);
                prop_assert!(p.travel_speed <= config.travel_speed_max);
                prop_assert!(p.response_window >= config.response_window_min);
                prop_assert!(p.response_window <= config.response_window_start);
                prop_assert!(p.remap_duration >= config.remap_duration_min);
                prop_assert!(p.remap_duration <= config.remap_duration_start);
                prop_assert!(p.resolve_anim_speed >= config.resolve_anim_speed_start);
                prop_assert!(p.resolve_anim_speed <= config.resolve_anim_speed_max);
                prev = p;
            }
        }
    }
}
