//! Headless runner
//!
//! Drives a [`Session`] at the fixed simulation step with a simple autopilot:
//! aim at the lowest enemy (with lead) and hold fire while there is one.

use glam::Vec2;

use crate::audio::AudioSink;
use crate::consts::SIM_DT;
use crate::platform::Presenter;
use crate::session::Session;
use crate::sim::{FallerKind, GamePhase, GameState, LoopControl, TickInput};

/// Outcome of a headless run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub player: String,
    pub score: u64,
    pub health: u8,
    pub time_left: u32,
    pub bullets: u32,
    pub phase: GamePhase,
    /// Host frames simulated
    pub frames: u64,
}

/// Aims at the enemy closest to breaching
#[derive(Debug, Clone, Copy, Default)]
pub struct Autopilot;

impl Autopilot {
    /// Where to aim, if there is anything to shoot
    pub fn target(&self, state: &GameState) -> Option<Vec2> {
        let lowest = state
            .fallers(FallerKind::Enemy)
            .iter()
            .filter(|e| e.pos.y >= 0.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))?;

        // Lead the target by the bullet's travel time
        let center = lowest.center();
        let frames = center.distance(state.attacker.pos) / state.bullet_speed.max(0.1);
        Some(center + Vec2::new(0.0, lowest.speed * frames))
    }

    /// Input for the next frame
    pub fn input(&self, state: &GameState) -> TickInput {
        match self.target(state) {
            Some(aim) => TickInput {
                pointer: Some(aim),
                fire_pressed: !state.firing && state.bullets > 0,
                ..Default::default()
            },
            None => TickInput {
                fire_released: state.firing,
                ..Default::default()
            },
        }
    }
}

/// Play `name` for up to `seconds` of game time, or until the game ends
pub fn run<P: Presenter, A: AudioSink>(
    session: &mut Session<P, A>,
    name: &str,
    seconds: f32,
) -> RunSummary {
    session.begin(name);

    let pilot = Autopilot;
    let max_frames = (seconds.max(0.0) / SIM_DT).ceil() as u64;
    let mut frames = 0;
    while frames < max_frames {
        let input = pilot.input(&session.state);
        frames += 1;
        if session.frame(&input, SIM_DT) == LoopControl::Stop {
            break;
        }
    }

    let state = &session.state;
    log::info!(
        "Headless run finished after {} frames: score {}, phase {:?}",
        frames,
        state.score,
        state.phase
    );
    RunSummary {
        player: session.player_name.clone(),
        score: state.score,
        health: state.health,
        time_left: state.time_left,
        bullets: state.bullets,
        phase: state.phase,
        frames,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentAudio;
    use crate::persistence::MemoryStore;
    use crate::platform::HeadlessPresenter;
    use crate::sim::Faller;
    use crate::tuning::Tuning;

    fn session(tuning: Tuning, seed: u64) -> Session<HeadlessPresenter, SilentAudio> {
        Session::new(
            tuning,
            800.0,
            600.0,
            seed,
            Box::new(MemoryStore::new()),
            HeadlessPresenter::new(),
            SilentAudio,
        )
    }

    #[test]
    fn test_autopilot_targets_lowest_enemy() {
        let mut state = GameState::new(Tuning::default(), 800.0, 600.0, 1);
        state.start();
        assert!(Autopilot.target(&state).is_none());

        for y in [40.0, 250.0, 120.0] {
            state.fallers_mut(FallerKind::Enemy).push(Faller {
                kind: FallerKind::Enemy,
                pos: Vec2::new(100.0, y),
                size: 20.0,
                speed: 0.0,
            });
        }
        let aim = Autopilot.target(&state).unwrap();
        assert_eq!(aim, Vec2::new(110.0, 260.0));

        let input = Autopilot.input(&state);
        assert!(input.fire_pressed);
        assert_eq!(input.pointer, Some(aim));
    }

    #[test]
    fn test_autopilot_releases_when_idle() {
        let mut state = GameState::new(Tuning::default(), 800.0, 600.0, 1);
        state.start();
        state.firing = true;
        let input = Autopilot.input(&state);
        assert!(input.fire_released);
        assert!(input.pointer.is_none());
    }

    #[test]
    fn test_run_scores_and_finishes() {
        let tuning = Tuning {
            time_limit: 20,
            ..Default::default()
        };
        let mut session = session(tuning, 1234);
        let summary = run(&mut session, "bot", 60.0);

        assert_eq!(summary.phase, GamePhase::GameOver);
        assert_eq!(summary.player, "bot");
        assert!(summary.score > 0);
        assert!(summary.bullets < 5000);
        assert_eq!(session.leaderboard.score_of("bot"), Some(summary.score));
    }

    #[test]
    fn test_run_is_deterministic_for_seed() {
        let a = run(&mut session(Tuning::default(), 77), "bot", 5.0);
        let b = run(&mut session(Tuning::default(), 77), "bot", 5.0);
        assert_eq!(a, b);
        assert_eq!(a.frames, 300);
        assert_eq!(a.phase, GamePhase::Running);
    }
}
