//! Game session
//!
//! Binds one [`GameState`] to its collaborators: the leaderboard store, the
//! presenter and the audio sink. Hosts feed it input and elapsed time; the
//! session runs fixed simulation steps and turns the resulting events into
//! sounds, prompts and leaderboard updates.

use crate::audio::{AudioCue, AudioSink};
use crate::consts::{MAX_SUBSTEPS, READOUT_INTERVAL, SIM_DT};
use crate::highscores::Leaderboard;
use crate::persistence::{self, LeaderboardStore};
use crate::platform::{self, Presenter, Readout};
use crate::sim::{FallerKind, GameEvent, GamePhase, GameState, LoopControl, TickInput, tick};
use crate::tuning::Tuning;

/// Longest host frame the session will simulate in one go (seconds)
const MAX_FRAME_DT: f32 = 0.1;

pub struct Session<P: Presenter, A: AudioSink> {
    pub state: GameState,
    pub leaderboard: Leaderboard,
    pub player_name: String,
    pub presenter: P,
    pub audio: A,
    store: Box<dyn LeaderboardStore>,
    /// Unsimulated time carried to the next frame
    accumulator: f32,
    /// Input not yet consumed by a simulation step
    pending: TickInput,
    /// Time since the readout was last refreshed
    readout_elapsed: f32,
}

impl<P: Presenter, A: AudioSink> Session<P, A> {
    /// Create an idle session and list the stored leaderboard
    pub fn new(
        tuning: Tuning,
        width: f32,
        height: f32,
        seed: u64,
        store: Box<dyn LeaderboardStore>,
        presenter: P,
        audio: A,
    ) -> Self {
        let leaderboard = persistence::load_or_empty(&*store);
        let mut session = Self {
            state: GameState::new(tuning, width, height, seed),
            leaderboard,
            player_name: String::new(),
            presenter,
            audio,
            store,
            accumulator: 0.0,
            pending: TickInput::default(),
            readout_elapsed: 0.0,
        };
        session
            .presenter
            .render_leaderboard(&session.leaderboard, &session.player_name);
        session.refresh_readout();
        session
    }

    /// Show the name prompt, pre-filled with `default_name`
    pub fn prompt_name(&mut self, default_name: &str) {
        self.presenter.show_name_prompt(default_name);
    }

    /// Start play under the name the player entered.
    /// Returns false if the session already started.
    pub fn begin(&mut self, raw_name: &str) -> bool {
        if self.state.phase != GamePhase::Idle {
            return false;
        }

        self.player_name = platform::sanitize_name(raw_name);
        if self.leaderboard.rank_of(&self.player_name).is_none() {
            self.leaderboard.register(&self.player_name);
            persistence::save_or_warn(&mut *self.store, &self.leaderboard);
        }
        log::info!("Player {} joined", self.player_name);

        self.presenter.hide_name_prompt();
        self.presenter
            .render_leaderboard(&self.leaderboard, &self.player_name);
        self.audio.play(AudioCue::ButtonClick);
        self.audio.play(AudioCue::MusicStart);

        self.state.start();
        self.dispatch_events();
        self.refresh_readout();
        true
    }

    /// Queue input for the next simulation step
    pub fn queue_input(&mut self, input: &TickInput) {
        merge_input(&mut self.pending, input);
    }

    /// Advance by one host frame of `dt` seconds
    pub fn frame(&mut self, input: &TickInput, dt: f32) -> LoopControl {
        self.queue_input(input);

        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = std::mem::take(&mut self.pending);
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
            self.dispatch_events();
        }

        self.readout_elapsed += dt;
        if self.readout_elapsed >= READOUT_INTERVAL {
            self.refresh_readout();
        }

        self.loop_control()
    }

    /// Toggle pause right away (keyboard or overlay button)
    pub fn toggle_pause(&mut self) {
        self.state.toggle_pause();
        self.dispatch_events();
    }

    /// Play again after a game over
    pub fn restart(&mut self) -> LoopControl {
        if self.state.phase != GamePhase::GameOver {
            return self.loop_control();
        }
        self.audio.play(AudioCue::ButtonClick);
        self.state.reset();
        self.accumulator = 0.0;
        self.pending = TickInput::default();
        self.audio.play(AudioCue::MusicStart);
        self.dispatch_events();
        self.refresh_readout();
        self.loop_control()
    }

    /// Space bar: pauses or resumes play, and starts over from the game-over
    /// screen. None when the key means nothing in the current phase.
    pub fn pause_or_restart(&mut self) -> Option<LoopControl> {
        match self.state.phase {
            GamePhase::Running | GamePhase::Paused => {
                self.toggle_pause();
                Some(self.loop_control())
            }
            GamePhase::GameOver => Some(self.restart()),
            GamePhase::Idle => None,
        }
    }

    /// The drawing surface changed size
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height);
    }

    pub fn loop_control(&self) -> LoopControl {
        if self.state.is_over() {
            LoopControl::Stop
        } else {
            LoopControl::Continue
        }
    }

    /// Persistence backend
    pub fn store(&self) -> &dyn LeaderboardStore {
        &*self.store
    }

    fn refresh_readout(&mut self) {
        self.readout_elapsed = 0.0;
        self.presenter
            .refresh_readout(&Readout::from_state(&self.state));
    }

    /// Route simulation events to audio, presenter and leaderboard
    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Paused => self.presenter.show_pause_overlay(),
                GameEvent::Resumed => self.presenter.hide_pause_overlay(),
                GameEvent::Reset => {
                    self.presenter.hide_game_over();
                    self.presenter.hide_pause_overlay();
                }
                GameEvent::Fired => self.audio.play(AudioCue::Fire),
                GameEvent::Spawned { kind } => self.audio.play(AudioCue::PickupSpawn(kind)),
                GameEvent::Hit {
                    kind: FallerKind::Enemy,
                    ..
                } => self.audio.play(AudioCue::EnemyHit),
                GameEvent::Hit { kind, .. } => self.audio.play(AudioCue::PickupHit(kind)),
                GameEvent::OutOfAmmo => log::info!("Out of ammunition"),
                GameEvent::GameOver { score } => self.finish(score),
                GameEvent::Started
                | GameEvent::Volley { .. }
                | GameEvent::Breach { .. }
                | GameEvent::TimeTick { .. }
                | GameEvent::BulletSpeedReduced { .. }
                | GameEvent::BulletSpeedRestored { .. } => {}
            }
        }
    }

    /// Commit the final score and show the game-over prompt
    fn finish(&mut self, score: u64) {
        let rank = self.leaderboard.upsert(&self.player_name, score);
        persistence::save_or_warn(&mut *self.store, &self.leaderboard);
        match rank {
            Some(rank) => log::info!("{} finished with {} (rank {})", self.player_name, score, rank),
            None => log::info!("{} finished with {}", self.player_name, score),
        }

        self.audio.play(AudioCue::MusicStop);
        self.audio.play(AudioCue::GameOver);
        self.refresh_readout();
        self.presenter.show_game_over(score);
        self.presenter
            .render_leaderboard(&self.leaderboard, &self.player_name);
    }
}

/// Fold `input` into `pending`: edges accumulate, latest pointer wins.
/// Two pause presses cancel out.
fn merge_input(pending: &mut TickInput, input: &TickInput) {
    if input.pointer.is_some() {
        pending.pointer = input.pointer;
    }
    if input.resize.is_some() {
        pending.resize = input.resize;
    }
    pending.fire_pressed |= input.fire_pressed;
    pending.fire_released |= input.fire_released;
    pending.pause ^= input.pause;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::LogAudio;
    use crate::persistence::{JsonFileStore, MemoryStore, load_or_empty};
    use crate::platform::HeadlessPresenter;
    use glam::Vec2;

    type TestSession = Session<HeadlessPresenter, LogAudio>;

    fn quiet_tuning(time_limit: u32) -> Tuning {
        let mut tuning = Tuning {
            time_limit,
            ..Default::default()
        };
        for spec in [
            &mut tuning.enemy,
            &mut tuning.golden_box,
            &mut tuning.blue_box,
            &mut tuning.power_down,
            &mut tuning.health_down,
        ] {
            spec.spawn_period = 10_000.0;
        }
        tuning
    }

    fn session(tuning: Tuning, store: Box<dyn LeaderboardStore>) -> TestSession {
        Session::new(
            tuning,
            800.0,
            600.0,
            9,
            store,
            HeadlessPresenter::new(),
            LogAudio::new(),
        )
    }

    /// Run frames until the loop stops (or a safety limit)
    fn run_until_stop(session: &mut TestSession, limit: usize) -> usize {
        for i in 0..limit {
            if session.frame(&TickInput::default(), SIM_DT) == LoopControl::Stop {
                return i + 1;
            }
        }
        limit
    }

    #[test]
    fn test_begin_registers_player() {
        let mut session = session(Tuning::default(), Box::new(MemoryStore::new()));
        session.prompt_name("Anonymous");
        assert!(session.presenter.name_prompt);

        assert!(session.begin("  ada  "));
        assert!(!session.begin("bob"));

        assert_eq!(session.player_name, "ada");
        assert_eq!(session.state.phase, GamePhase::Running);
        assert_eq!(session.leaderboard.score_of("ada"), Some(0));
        assert!(!session.presenter.name_prompt);
        assert!(session.audio.music_on);
        assert!(session.presenter.leaderboard[0].3);
        assert_eq!(load_or_empty(session.store()).score_of("ada"), Some(0));
    }

    #[test]
    fn test_blank_name_defaults() {
        let mut session = session(Tuning::default(), Box::new(MemoryStore::new()));
        session.begin("   ");
        assert_eq!(session.player_name, "Anonymous");
    }

    #[test]
    fn test_timeout_records_zero_score() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.json");
        let mut session = session(quiet_tuning(10), Box::new(JsonFileStore::new(&path)));
        session.begin("ada");

        let frames = run_until_stop(&mut session, 1000);
        assert!(frames < 1000);

        assert_eq!(session.state.phase, GamePhase::GameOver);
        assert_eq!(session.state.time_left, 0);
        assert_eq!(session.state.health, 100);
        assert_eq!(session.state.score, 0);
        assert_eq!(session.presenter.game_over, Some(0));
        assert_eq!(session.presenter.readout.time_left, 0);
        assert_eq!(session.audio.count(AudioCue::GameOver), 1);
        assert!(!session.audio.music_on);

        let stored = JsonFileStore::new(&path).load().unwrap();
        assert_eq!(stored.score_of("ada"), Some(0));
    }

    #[test]
    fn test_game_over_keeps_best_score() {
        let mut board = Leaderboard::new();
        board.upsert("ada", 50);
        let mut session = session(quiet_tuning(2), Box::new(MemoryStore::with(board)));
        session.begin("ada");
        session.state.score = 20;

        run_until_stop(&mut session, 1000);
        assert_eq!(session.leaderboard.score_of("ada"), Some(50));

        session.restart();
        session.state.score = 70;
        run_until_stop(&mut session, 1000);
        assert_eq!(session.leaderboard.score_of("ada"), Some(70));
        assert_eq!(load_or_empty(session.store()).score_of("ada"), Some(70));
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut session = session(quiet_tuning(1), Box::new(MemoryStore::new()));
        session.begin("ada");
        run_until_stop(&mut session, 1000);
        assert_eq!(session.frame(&TickInput::default(), SIM_DT), LoopControl::Stop);

        assert_eq!(session.restart(), LoopControl::Continue);
        assert_eq!(session.state.phase, GamePhase::Running);
        assert_eq!(session.state.time_left, 1);
        assert_eq!(session.presenter.game_over, None);
        assert_eq!(session.audio.count(AudioCue::MusicStart), 2);
    }

    #[test]
    fn test_space_pauses_and_restarts() {
        let mut session = session(quiet_tuning(1), Box::new(MemoryStore::new()));
        assert_eq!(session.pause_or_restart(), None);

        session.begin("ada");
        assert_eq!(session.pause_or_restart(), Some(LoopControl::Continue));
        assert_eq!(session.state.phase, GamePhase::Paused);
        assert_eq!(session.pause_or_restart(), Some(LoopControl::Continue));
        assert_eq!(session.state.phase, GamePhase::Running);

        run_until_stop(&mut session, 1000);
        assert_eq!(session.state.phase, GamePhase::GameOver);
        assert_eq!(session.pause_or_restart(), Some(LoopControl::Continue));
        assert_eq!(session.state.phase, GamePhase::Running);
        assert_eq!(session.presenter.game_over, None);
    }

    #[test]
    fn test_pause_shows_overlay_and_loop_continues() {
        let mut session = session(Tuning::default(), Box::new(MemoryStore::new()));
        session.begin("ada");

        session.toggle_pause();
        assert!(session.presenter.pause_overlay);
        for _ in 0..120 {
            assert_eq!(session.frame(&TickInput::default(), SIM_DT), LoopControl::Continue);
        }
        assert_eq!(session.state.time_left, 100);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        session.frame(&pause, SIM_DT);
        assert!(!session.presenter.pause_overlay);
        assert_eq!(session.state.phase, GamePhase::Running);
    }

    #[test]
    fn test_fire_plays_cue() {
        let mut session = session(quiet_tuning(100), Box::new(MemoryStore::new()));
        session.begin("ada");
        let tap = TickInput {
            pointer: Some(Vec2::new(400.0, 0.0)),
            fire_pressed: true,
            fire_released: true,
            ..Default::default()
        };
        session.frame(&tap, SIM_DT);
        assert_eq!(session.audio.count(AudioCue::Fire), 1);
        assert_eq!(session.state.bullets, 4999);
    }

    #[test]
    fn test_short_frames_keep_input() {
        let mut session = session(quiet_tuning(100), Box::new(MemoryStore::new()));
        session.begin("ada");
        let press = TickInput {
            fire_pressed: true,
            ..Default::default()
        };
        // Too short for a step: input waits for the next one
        session.frame(&press, SIM_DT / 4.0);
        assert_eq!(session.state.bullets, 5000);
        session.frame(&TickInput::default(), SIM_DT);
        assert_eq!(session.state.bullets, 4999);
    }

    #[test]
    fn test_readout_is_throttled() {
        let mut session = session(quiet_tuning(100), Box::new(MemoryStore::new()));
        session.begin("ada");
        let before = session.presenter.readout_refreshes;
        for _ in 0..60 {
            session.frame(&TickInput::default(), SIM_DT);
        }
        let refreshes = session.presenter.readout_refreshes - before;
        assert!((4..=6).contains(&refreshes), "{refreshes} refreshes in 1s");
    }

    #[test]
    fn test_unavailable_store_still_plays() {
        let mut session = session(
            quiet_tuning(1),
            Box::new(crate::persistence::UnavailableStore),
        );
        session.begin("ada");
        run_until_stop(&mut session, 1000);
        assert_eq!(session.leaderboard.score_of("ada"), Some(0));
        assert_eq!(session.presenter.game_over, Some(0));
    }

    #[test]
    fn test_merge_input() {
        let mut pending = TickInput::default();
        let pause = TickInput {
            pause: true,
            pointer: Some(Vec2::new(1.0, 2.0)),
            ..Default::default()
        };
        merge_input(&mut pending, &pause);
        merge_input(&mut pending, &pause);
        assert!(!pending.pause);
        assert_eq!(pending.pointer, Some(Vec2::new(1.0, 2.0)));
    }
}
