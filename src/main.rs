//! Stamp Rush entry point
//!
//! Headless demo driver: stands in for the visual layer by answering the
//! core's animation requests on a timer, and plays the game with a simple
//! bot so the whole loop can be watched through the log output.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use stamp_rush::consts::SIM_DT;
use stamp_rush::sim::{SessionEvent, SessionState, Slot, TickInput, tick};
use stamp_rush::SessionConfig;

/// How long the demo pretends the stamp animation takes at 1x speed
const STAMP_ANIM_SECS: f32 = 0.4;
/// Finale cue length
const FINAL_CUE_SECS: f32 = 1.2;
/// Bot reaction time after a paper arrives
const BOT_REACTION_SECS: f32 = 0.35;
/// Chance the bot presses a wrong slot
const BOT_ERROR_RATE: f64 = 0.15;

/// Stand-in visual layer: one outstanding animation at a time, completed
/// after its duration has elapsed.
#[derive(Debug, Default)]
struct FakeAnimations {
    resolve_remaining: Option<f32>,
    remap_remaining: Option<f32>,
    final_cue_remaining: Option<f32>,
}

impl FakeAnimations {
    fn observe(&mut self, event: &SessionEvent, resolve_anim_speed: f32) {
        match event {
            SessionEvent::RequestStamp(color) => {
                log::debug!("[visual] stamp cue: {}", color.as_str());
                self.resolve_remaining = Some(STAMP_ANIM_SECS / resolve_anim_speed);
            }
            SessionEvent::RequestRemapAnimation { duration, next } => {
                log::debug!("[visual] remap animation toward {next:?}");
                self.remap_remaining = Some(*duration);
            }
            SessionEvent::RequestEscalationCue { level, finale } => {
                log::debug!("[visual] escalation cue, level {level}");
                if *finale {
                    self.final_cue_remaining = Some(FINAL_CUE_SECS);
                }
            }
            _ => {}
        }
    }

    /// Advance the pretend animations and report completions
    fn advance(&mut self, dt: f32, input: &mut TickInput) {
        for (remaining, flag) in [
            (&mut self.resolve_remaining, &mut input.resolve_complete),
            (&mut self.remap_remaining, &mut input.remap_complete),
            (&mut self.final_cue_remaining, &mut input.final_cue_complete),
        ] {
            if let Some(left) = remaining {
                *left -= dt;
                if *left <= 0.0 {
                    *remaining = None;
                    *flag = true;
                }
            }
        }
    }
}

fn parse_args() -> (u64, SessionConfig) {
    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| std::time::UNIX_EPOCH.elapsed().map(|d| d.as_secs()).unwrap_or(0));
    let config = match args.next() {
        Some(path) => match SessionConfig::load(std::path::Path::new(&path)) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("bad config file: {err}");
                std::process::exit(1);
            }
        },
        None => SessionConfig::default(),
    };
    (seed, config)
}

fn main() {
    env_logger::init();

    let (seed, config) = parse_args();
    log::info!("Stamp Rush demo starting (seed {seed})");

    let mut session = match SessionState::new(config, seed) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("invalid session config: {err}");
            std::process::exit(1);
        }
    };

    // The bot rolls its own dice; the session RNG stays reproducible
    let mut bot_rng = Pcg32::seed_from_u64(seed ^ 0xB07);
    let mut animations = FakeAnimations::default();
    let mut waiting_for: Option<f32> = None;
    let mut input = TickInput::default();

    // Cap the demo at ten minutes of simulated play
    let max_ticks = (600.0 / SIM_DT) as u64;
    for _ in 0..max_ticks {
        animations.advance(SIM_DT, &mut input);

        // Bot: react a beat after a paper arrives, usually correctly
        if !session.is_blocking() {
            if let Some(paper) = session.queue.awaiting() {
                let timer = waiting_for.get_or_insert(BOT_REACTION_SECS);
                *timer -= SIM_DT;
                if *timer <= 0.0 {
                    let slot = if bot_rng.random_bool(BOT_ERROR_RATE) {
                        Slot::ALL[bot_rng.random_range(0..Slot::ALL.len())]
                    } else {
                        *Slot::ALL
                            .iter()
                            .find(|s| session.mapping.color_for(**s) == paper.color)
                            .expect("mapping is a bijection")
                    };
                    input.pressed = Some(slot);
                    waiting_for = None;
                }
            } else {
                waiting_for = None;
            }
        }

        tick(&mut session, &input, SIM_DT);
        input = TickInput::default();

        let anim_speed = session.ramp.params_at(session.elapsed).resolve_anim_speed;
        for event in session.drain_events() {
            animations.observe(&event, anim_speed);
            match event {
                SessionEvent::ScoreChanged(score) => log::info!("[ui] score {score}"),
                SessionEvent::AngerChanged { level, max } => {
                    log::info!("[ui] boss anger {level}/{max}");
                }
                SessionEvent::MappingChanged(next) => log::info!("[ui] mapping now {next:?}"),
                SessionEvent::GameOver { final_score } => {
                    println!("Game over! Final score: {final_score}");
                    return;
                }
                _ => {}
            }
        }
    }

    println!(
        "Demo time limit reached. Score {} at anger {}/{}",
        session.score,
        session.anger.level(),
        session.anger.max()
    );
}
