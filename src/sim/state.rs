//! Session state and core simulation types
//!
//! Everything the tick reads or mutates lives here; the session is the
//! single writer and there is no global/singleton access.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::anger::AngerMeter;
use super::difficulty::DifficultyRamp;
use super::mapping::MappingTable;
use super::queue::PaperQueue;
use crate::config::{ConfigError, SessionConfig};

/// The four paper colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StampColor {
    Red,
    Blue,
    Green,
    Yellow,
}

impl StampColor {
    pub const ALL: [StampColor; 4] = [
        StampColor::Red,
        StampColor::Blue,
        StampColor::Green,
        StampColor::Yellow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StampColor::Red => "Red",
            StampColor::Blue => "Blue",
            StampColor::Green => "Green",
            StampColor::Yellow => "Yellow",
        }
    }
}

/// The four fixed input directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Up,
    Down,
    Left,
    Right,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::Up, Slot::Down, Slot::Left, Slot::Right];

    /// Index into slot-ordered arrays (mapping assignment, config)
    pub fn index(&self) -> usize {
        match self {
            Slot::Up => 0,
            Slot::Down => 1,
            Slot::Left => 2,
            Slot::Right => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Up => "Up",
            Slot::Down => "Down",
            Slot::Left => "Left",
            Slot::Right => "Right",
        }
    }
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Countdown before the first paper spawns; no input accepted
    LeadIn,
    /// Active gameplay
    Running,
    /// Terminal: anger reached its maximum. Only `reset` leaves this phase.
    GameOver,
}

/// Outcome of resolving a paper against the current mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// An outstanding visual task that suspends gameplay.
///
/// At most one may be outstanding at a time; while one is, spawning, input
/// and the response-timeout clock are all frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockingTask {
    /// Stamp/resolve animation, completed by `TickInput::resolve_complete`
    Resolve,
    /// Mapping shuffle animation, completed by `TickInput::remap_complete`
    Remap,
    /// Max-anger finale cue, completed by `TickInput::final_cue_complete`
    FinalCue,
}

/// Outbound traffic to the visual/UI collaborators.
///
/// `Request*` events expect exactly one completion signal back through
/// [`super::TickInput`]; the `notify`-style events are fire-and-forget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Play the stamp cue for the pressed slot's color. Emitted on every
    /// press, correct or not; the outcome surfaces through anger events.
    RequestStamp(StampColor),
    /// Play the anger cue for the new level. `finale` is set at max level
    /// and then (only then) a `final_cue_complete` signal is expected.
    RequestEscalationCue { level: u8, finale: bool },
    /// Animate the positional shuffle toward `next`; `remap_complete` is
    /// expected back once.
    RequestRemapAnimation {
        duration: f32,
        next: [StampColor; 4],
    },
    /// Score display update
    ScoreChanged(u32),
    /// Anger display update
    AngerChanged { level: u8, max: u8 },
    /// New slot-ordered assignment, installed after the remap animation
    MappingChanged([StampColor; 4]),
    /// Seconds left to answer the currently awaiting paper
    TimeRemaining(f32),
    /// Session ended; emitted exactly once
    GameOver { final_score: u32 },
}

/// Complete session state: one mapping table, one anger meter, one paper
/// pipeline, one difficulty ramp, score and the suspendable response timer.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub config: SessionConfig,
    /// Session seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: SessionPhase,
    /// Countdown remaining while in `LeadIn`
    pub lead_in_remaining: f32,
    /// Session time driving the difficulty ramp (excludes lead-in)
    pub elapsed: f32,
    pub mapping: MappingTable,
    pub queue: PaperQueue,
    pub anger: AngerMeter,
    pub ramp: DifficultyRamp,
    pub score: u32,
    /// Time the awaiting paper has been waiting, excluding blocked spans
    pub response_elapsed: f32,
    /// The single outstanding visual task, if any
    pub blocking: Option<BlockingTask>,
    /// Outcome recorded at input time, applied when the resolve completes
    pub(crate) pending_outcome: Option<Outcome>,
    /// A shuffle has been armed and starts once nothing is blocking
    pub(crate) pending_remap: bool,
    /// Permutation drawn at remap start, installed at remap completion
    pub(crate) pending_mapping: Option<[StampColor; 4]>,
    /// Correct matches since the last shuffle (for `EveryNCorrect`)
    pub(crate) corrects_since_remap: u32,
    events: Vec<SessionEvent>,
}

impl SessionState {
    /// Create a session. Fails fast on invalid configuration; nothing else
    /// in the simulation can fail.
    pub fn new(config: SessionConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config, seed))
    }

    fn from_valid_config(config: SessionConfig, seed: u64) -> Self {
        let phase = if config.lead_in > 0.0 {
            SessionPhase::LeadIn
        } else {
            SessionPhase::Running
        };
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase,
            lead_in_remaining: config.lead_in,
            elapsed: 0.0,
            mapping: MappingTable::new(config.initial_mapping),
            queue: PaperQueue::new(config.spawn_point, config.destination),
            anger: AngerMeter::new(config.max_anger, config.required_streak_to_calm),
            ramp: DifficultyRamp::from_config(&config),
            score: 0,
            response_elapsed: 0.0,
            blocking: None,
            pending_outcome: None,
            pending_remap: false,
            pending_mapping: None,
            corrects_since_remap: 0,
            events: Vec::new(),
            config,
        }
    }

    /// Restart with a fresh seed: initial mapping, anger 0, score 0, empty
    /// pipeline. The configuration is kept.
    pub fn reset(&mut self, seed: u64) {
        log::info!("Session reset (seed {seed})");
        *self = Self::from_valid_config(self.config.clone(), seed);
    }

    /// Take all events emitted since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    /// Start a blocking visual task. Starting one while another is
    /// outstanding is a programming error.
    pub(crate) fn begin_blocking(&mut self, task: BlockingTask) {
        debug_assert!(
            self.blocking.is_none(),
            "blocking task {task:?} started while {:?} outstanding",
            self.blocking
        );
        self.blocking = Some(task);
    }

    pub fn is_blocking(&self) -> bool {
        self.blocking.is_some()
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_in_lead_in() {
        let state = SessionState::new(SessionConfig::default(), 7).unwrap();
        assert_eq!(state.phase, SessionPhase::LeadIn);
        assert_eq!(state.score, 0);
        assert_eq!(state.anger.level(), 0);
        assert!(state.queue.is_empty());
    }

    #[test]
    fn test_zero_lead_in_starts_running() {
        let config = SessionConfig {
            lead_in: 0.0,
            ..Default::default()
        };
        let state = SessionState::new(config, 7).unwrap();
        assert_eq!(state.phase, SessionPhase::Running);
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let config = SessionConfig {
            max_anger: 0,
            ..Default::default()
        };
        assert!(SessionState::new(config, 7).is_err());
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut state = SessionState::new(SessionConfig::default(), 7).unwrap();
        state.score = 12;
        state.phase = SessionPhase::GameOver;
        state.reset(8);
        assert_eq!(state.seed, 8);
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, SessionPhase::LeadIn);
        assert_eq!(
            state.mapping.assignment(),
            SessionConfig::default().initial_mapping
        );
    }
}
