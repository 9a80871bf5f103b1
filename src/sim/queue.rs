//! Paper pipeline
//!
//! Stored as an `Option` but deliberately a single-slot pipeline: one paper
//! travels, waits or resolves at a time, and the next spawn is polled, not
//! scheduled. Never more than one paper is in `AwaitingInput`/`Resolving`.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::StampColor;
use crate::consts::ARRIVAL_EPSILON;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperState {
    /// Moving from spawn point toward the destination
    Traveling,
    /// At the destination, response clock running
    AwaitingInput,
    /// Stamped; waiting for the resolve animation to finish
    Resolving,
}

/// A color-tagged paper traveling the fixed path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
    pub id: u32,
    pub color: StampColor,
    pub pos: Vec2,
    /// Travel speed captured from the difficulty ramp at spawn time
    pub speed: f32,
    pub state: PaperState,
}

#[derive(Debug, Clone)]
pub struct PaperQueue {
    spawn_point: Vec2,
    destination: Vec2,
    slot: Option<Paper>,
    next_id: u32,
}

impl PaperQueue {
    pub fn new(spawn_point: Vec2, destination: Vec2) -> Self {
        Self {
            spawn_point,
            destination,
            slot: None,
            next_id: 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    pub fn current(&self) -> Option<&Paper> {
        self.slot.as_ref()
    }

    /// The paper currently awaiting input, if any
    pub fn awaiting(&self) -> Option<&Paper> {
        self.slot
            .as_ref()
            .filter(|p| p.state == PaperState::AwaitingInput)
    }

    /// Spawn a paper with a uniform random color if the slot is free.
    /// Polled every tick; an occupied slot is the normal case, not an
    /// error. The session-level blocking guard lives in the controller.
    pub fn try_spawn(&mut self, rng: &mut Pcg32, speed: f32) -> Option<&Paper> {
        if self.slot.is_some() {
            return None;
        }
        let color = StampColor::ALL[rng.random_range(0..StampColor::ALL.len())];
        let id = self.next_id;
        self.next_id += 1;
        let paper = Paper {
            id,
            color,
            pos: self.spawn_point,
            speed,
            state: PaperState::Traveling,
        };
        log::debug!("Paper #{id} spawned ({})", color.as_str());
        self.slot = Some(paper);
        self.slot.as_ref()
    }

    /// Move the traveling paper toward the destination. Returns true on
    /// the tick it arrives and flips to `AwaitingInput`; the controller
    /// restarts the response clock on that signal.
    pub fn advance(&mut self, dt: f32) -> bool {
        let Some(paper) = self.slot.as_mut() else {
            return false;
        };
        if paper.state != PaperState::Traveling {
            return false;
        }
        paper.pos = paper.pos.move_towards(self.destination, paper.speed * dt);
        if paper.pos.distance(self.destination) < ARRIVAL_EPSILON {
            paper.pos = self.destination;
            paper.state = PaperState::AwaitingInput;
            log::debug!("Paper #{} arrived ({})", paper.id, paper.color.as_str());
            return true;
        }
        false
    }

    /// Mark the awaiting paper as stamped. Returns its color, or None if
    /// no paper was awaiting input.
    pub fn begin_resolve(&mut self) -> Option<StampColor> {
        let paper = self
            .slot
            .as_mut()
            .filter(|p| p.state == PaperState::AwaitingInput)?;
        paper.state = PaperState::Resolving;
        Some(paper.color)
    }

    /// Destroy the current paper, freeing the slot for the next spawn
    pub fn resolve(&mut self) -> Option<Paper> {
        self.slot.take()
    }

    /// Drop everything (game over)
    pub fn clear(&mut self) {
        self.slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn queue() -> PaperQueue {
        PaperQueue::new(Vec2::new(0.0, 6.0), Vec2::ZERO)
    }

    #[test]
    fn test_spawn_only_into_empty_slot() {
        let mut queue = queue();
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(queue.try_spawn(&mut rng, 2.0).is_some());
        assert!(queue.try_spawn(&mut rng, 2.0).is_none());
        assert_eq!(queue.current().unwrap().id, 1);
    }

    #[test]
    fn test_advance_reaches_destination() {
        let mut queue = queue();
        let mut rng = Pcg32::seed_from_u64(1);
        queue.try_spawn(&mut rng, 2.0);

        // 6 units at 2 units/sec: not there after 2s, there by 4s
        let mut arrived = false;
        for _ in 0..20 {
            arrived = queue.advance(0.1) || arrived;
        }
        assert!(!arrived);
        for _ in 0..20 {
            arrived = queue.advance(0.1) || arrived;
        }
        assert!(arrived);
        let paper = queue.current().unwrap();
        assert_eq!(paper.state, PaperState::AwaitingInput);
        assert_eq!(paper.pos, Vec2::ZERO);
    }

    #[test]
    fn test_arrival_signaled_exactly_once() {
        let mut queue = queue();
        let mut rng = Pcg32::seed_from_u64(1);
        queue.try_spawn(&mut rng, 10.0);
        let mut arrivals = 0;
        for _ in 0..100 {
            if queue.advance(0.05) {
                arrivals += 1;
            }
        }
        assert_eq!(arrivals, 1);
    }

    #[test]
    fn test_resolve_frees_slot() {
        let mut queue = queue();
        let mut rng = Pcg32::seed_from_u64(1);
        queue.try_spawn(&mut rng, 100.0);
        while !queue.advance(0.1) {}
        let color = queue.begin_resolve().unwrap();
        assert_eq!(queue.current().unwrap().state, PaperState::Resolving);
        // Cannot stamp a second time
        assert!(queue.begin_resolve().is_none());
        let paper = queue.resolve().unwrap();
        assert_eq!(paper.color, color);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_at_most_one_paper_in_flight() {
        let mut queue = queue();
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..200 {
            queue.try_spawn(&mut rng, 5.0);
            queue.advance(0.02);
            assert!(queue.current().is_some());
            if queue.awaiting().is_some() && queue.current().unwrap().id % 2 == 0 {
                queue.begin_resolve();
                queue.resolve();
            }
        }
    }
}
