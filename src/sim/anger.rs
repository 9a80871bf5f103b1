//! Anger / escalation state machine
//!
//! An integer level in `[0, max]` plus a rolling correct-streak counter.
//! Every escalation and de-escalation moves the level by exactly one,
//! clamped at the bounds; reaching `max` is terminal until a session reset.

use serde::{Deserialize, Serialize};

/// What a single outcome did to the meter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AngerTransition {
    /// Streak advanced but nothing else happened
    None,
    /// Streak threshold hit: level after de-escalation (may still be 0)
    Calmed(u8),
    /// Level after escalation, below max
    Escalated(u8),
    /// Level hit max; the session is over once the finale cue completes
    Enraged,
}

#[derive(Debug, Clone)]
pub struct AngerMeter {
    level: u8,
    max: u8,
    streak: u32,
    required_streak: u32,
}

impl AngerMeter {
    pub fn new(max: u8, required_streak: u32) -> Self {
        Self {
            level: 0,
            max,
            streak: 0,
            required_streak,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn is_enraged(&self) -> bool {
        self.level >= self.max
    }

    /// A correct match. At `required_streak` consecutive corrects the boss
    /// calms down one level and the streak restarts, even at level 0.
    pub fn on_correct(&mut self) -> AngerTransition {
        if self.is_enraged() {
            return AngerTransition::None;
        }
        self.streak += 1;
        if self.streak < self.required_streak {
            return AngerTransition::None;
        }
        self.streak = 0;
        self.level = self.level.saturating_sub(1);
        log::info!("Boss calmed to {}/{}", self.level, self.max);
        AngerTransition::Calmed(self.level)
    }

    /// A mismatch or timeout. Escalates one level and kills the streak;
    /// hitting `max` is fatal to the session.
    pub fn on_incorrect_or_timeout(&mut self) -> AngerTransition {
        if self.is_enraged() {
            return AngerTransition::None;
        }
        self.streak = 0;
        self.level = (self.level + 1).min(self.max);
        log::info!("Boss anger {}/{}", self.level, self.max);
        if self.is_enraged() {
            AngerTransition::Enraged
        } else {
            AngerTransition::Escalated(self.level)
        }
    }
}
