//! Session controller tick
//!
//! Advances the session deterministically: difficulty clock, paper travel
//! and polled spawning, the pause-aware response timeout, input routing,
//! and the anger/remap side effects. All collaborator completion signals
//! arrive through [`TickInput`] flags.

use super::difficulty::DifficultyParams;
use super::state::{BlockingTask, Outcome, SessionEvent, SessionPhase, SessionState, Slot};
use crate::config::RemapPolicy;

/// Inputs for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Slot pressed this tick, if any
    pub pressed: Option<Slot>,
    /// The stamp/resolve animation finished
    pub resolve_complete: bool,
    /// The mapping shuffle animation finished
    pub remap_complete: bool,
    /// The max-anger finale cue finished
    pub final_cue_complete: bool,
}

/// Advance the session by `dt` seconds
pub fn tick(session: &mut SessionState, input: &TickInput, dt: f32) {
    match session.phase {
        // Terminal: late completion signals and input must not mutate
        // score, anger or the queue.
        SessionPhase::GameOver => return,
        SessionPhase::LeadIn => {
            session.lead_in_remaining -= dt;
            if session.lead_in_remaining <= 0.0 {
                session.lead_in_remaining = 0.0;
                session.phase = SessionPhase::Running;
                log::info!("Lead-in over, papers incoming");
            }
            return;
        }
        SessionPhase::Running => {}
    }

    session.elapsed += dt;
    let params = session.ramp.params_at(session.elapsed);

    // Completion signals first, so a freed pipeline can spawn again and a
    // pending shuffle can start within the same tick.
    if input.resolve_complete {
        on_resolve_complete(session, &params);
    }
    if input.remap_complete {
        on_remap_complete(session);
    }
    if input.final_cue_complete {
        on_final_cue_complete(session);
        if session.is_game_over() {
            return;
        }
    }

    // Travel and polled spawn, suspended while a visual task runs
    let mut arrived = false;
    if !session.is_blocking() {
        arrived = session.queue.advance(dt);
        if arrived {
            session.response_elapsed = 0.0;
        }
        if session.queue.is_empty() {
            session.queue.try_spawn(&mut session.rng, params.travel_speed);
        }
    }

    // Response timeout. The clock starts the tick after arrival and is
    // frozen while a task is blocking, resuming where it left off, so
    // animations never eat into the player's response budget.
    if !session.is_blocking() && !arrived && session.queue.awaiting().is_some() {
        session.response_elapsed += dt;
        let remaining = (params.response_window - session.response_elapsed).max(0.0);
        session.push_event(SessionEvent::TimeRemaining(remaining));
        if session.response_elapsed > params.response_window {
            handle_timeout(session, &params);
        }
    }

    if let Some(slot) = input.pressed {
        handle_press(session, slot);
    }
}

/// Resolve a slot press against the awaiting paper. No-op unless exactly
/// one paper awaits input and nothing is blocking.
fn handle_press(session: &mut SessionState, slot: Slot) {
    if session.is_blocking() {
        return;
    }
    let expected = session.mapping.color_for(slot);
    let Some(color) = session.queue.begin_resolve() else {
        return;
    };

    // The stamp cue always shows the pressed slot's color; whether the
    // match was right is announced by the boss afterwards, not here.
    session.push_event(SessionEvent::RequestStamp(expected));
    session.begin_blocking(BlockingTask::Resolve);

    if color == expected {
        session.score += 1;
        session.push_event(SessionEvent::ScoreChanged(session.score));
        session.pending_outcome = Some(Outcome::Correct);
        log::info!(
            "Correct stamp on {} paper, score {}",
            color.as_str(),
            session.score
        );
    } else {
        session.pending_outcome = Some(Outcome::Incorrect);
        log::info!(
            "Wrong stamp: paper is {} but {} expects {}",
            color.as_str(),
            slot.as_str(),
            expected.as_str()
        );
    }
}

/// The awaiting paper ran out of response window. The paper is discarded
/// immediately (no stamp animation) and counts as incorrect.
fn handle_timeout(session: &mut SessionState, params: &DifficultyParams) {
    let Some(paper) = session.queue.resolve() else {
        return;
    };
    log::info!(
        "Time limit exceeded, {} paper discarded",
        paper.color.as_str()
    );
    session.response_elapsed = 0.0;
    apply_outcome(session, Outcome::Incorrect, params);
}

/// Stamp animation finished: destroy the paper and apply the recorded
/// outcome. A duplicate signal finds no pending outcome and does nothing.
fn on_resolve_complete(session: &mut SessionState, params: &DifficultyParams) {
    if session.blocking != Some(BlockingTask::Resolve) {
        return;
    }
    let Some(outcome) = session.pending_outcome.take() else {
        return;
    };
    session.queue.resolve();
    session.response_elapsed = 0.0;
    session.blocking = None;
    apply_outcome(session, outcome, params);
}

/// Feed the anger meter and route its consequences: display updates,
/// escalation cues, remap arming, the terminal finale.
fn apply_outcome(session: &mut SessionState, outcome: Outcome, params: &DifficultyParams) {
    use super::anger::AngerTransition;

    match outcome {
        Outcome::Correct => {
            if let RemapPolicy::EveryNCorrect(n) = session.config.remap_policy {
                session.corrects_since_remap += 1;
                if session.corrects_since_remap >= n {
                    session.corrects_since_remap = 0;
                    session.pending_remap = true;
                }
            }
            if let AngerTransition::Calmed(level) = session.anger.on_correct() {
                session.push_event(SessionEvent::AngerChanged {
                    level,
                    max: session.anger.max(),
                });
            }
        }
        Outcome::Incorrect => {
            if session.config.remap_policy == RemapPolicy::EveryIncorrect {
                session.pending_remap = true;
            }
            match session.anger.on_incorrect_or_timeout() {
                AngerTransition::Escalated(level) => {
                    let max = session.anger.max();
                    session.push_event(SessionEvent::AngerChanged { level, max });
                    session.push_event(SessionEvent::RequestEscalationCue {
                        level,
                        finale: false,
                    });
                }
                AngerTransition::Enraged => {
                    let max = session.anger.max();
                    session.push_event(SessionEvent::AngerChanged { level: max, max });
                    session.push_event(SessionEvent::RequestEscalationCue {
                        level: max,
                        finale: true,
                    });
                    session.begin_blocking(BlockingTask::FinalCue);
                    // Game over follows the finale cue; no shuffle now
                    return;
                }
                _ => {}
            }
        }
    }

    maybe_begin_remap(session, params);
}

/// Start the pending shuffle if nothing is blocking. The permutation is
/// drawn now (so the visual layer knows where things move) but installed
/// only when the animation completes.
fn maybe_begin_remap(session: &mut SessionState, params: &DifficultyParams) {
    if !session.pending_remap || session.is_blocking() || session.is_game_over() {
        return;
    }
    session.pending_remap = false;
    let next = session.mapping.draw_permutation(&mut session.rng);
    session.pending_mapping = Some(next);
    session.begin_blocking(BlockingTask::Remap);
    session.push_event(SessionEvent::RequestRemapAnimation {
        duration: params.remap_duration,
        next,
    });
    log::info!("Shuffling stamp positions over {:.2}s", params.remap_duration);
}

/// Shuffle animation finished: install the drawn permutation atomically
fn on_remap_complete(session: &mut SessionState) {
    if session.blocking != Some(BlockingTask::Remap) {
        return;
    }
    let Some(next) = session.pending_mapping.take() else {
        return;
    };
    session.mapping.install(next);
    session.blocking = None;
    session.push_event(SessionEvent::MappingChanged(next));
}

/// Finale cue finished: the session ends here, exactly once
fn on_final_cue_complete(session: &mut SessionState) {
    if session.blocking != Some(BlockingTask::FinalCue) {
        return;
    }
    session.blocking = None;
    session.phase = SessionPhase::GameOver;
    session.queue.clear();
    session.pending_remap = false;
    session.pending_mapping = None;
    session.pending_outcome = None;
    session.push_event(SessionEvent::GameOver {
        final_score: session.score,
    });
    log::info!("Game over, final score {}", session.score);
}
