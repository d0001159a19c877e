//! Platform abstraction layer
//!
//! Presentation collaborators the session talks to:
//! - Name prompt, pause overlay and game-over prompt
//! - Score / bullets / time readout
//! - Leaderboard listing
//!
//! `HeadlessPresenter` records what it was asked to show; `DomPresenter`
//! drives the browser page (wasm only).

#[cfg(target_arch = "wasm32")]
mod dom;

#[cfg(target_arch = "wasm32")]
pub use dom::DomPresenter;

use crate::consts::DEFAULT_PLAYER_NAME;
use crate::highscores::Leaderboard;
use crate::sim::GameState;

/// Values shown in the HUD readout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Readout {
    pub score: u64,
    pub bullets: u32,
    pub time_left: u32,
    pub health: u8,
}

impl Readout {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: state.score,
            bullets: state.bullets,
            time_left: state.time_left,
            health: state.health,
        }
    }
}

/// Everything the session needs to show to the player
pub trait Presenter {
    /// Ask for a player name, pre-filled with `default_name`
    fn show_name_prompt(&mut self, default_name: &str);
    fn hide_name_prompt(&mut self);
    fn show_pause_overlay(&mut self);
    fn hide_pause_overlay(&mut self);
    /// Game-over prompt with a play-again action
    fn show_game_over(&mut self, score: u64);
    fn hide_game_over(&mut self);
    fn refresh_readout(&mut self, readout: &Readout);
    /// List the leaderboard, highlighting `current_player`
    fn render_leaderboard(&mut self, board: &Leaderboard, current_player: &str);
}

/// Normalize a name typed by the player
pub fn sanitize_name(raw: &str) -> String {
    let name = raw.trim();
    if name.is_empty() {
        DEFAULT_PLAYER_NAME.to_string()
    } else {
        name.to_string()
    }
}

/// Presenter for tests and the headless runner
#[derive(Debug, Clone, Default)]
pub struct HeadlessPresenter {
    pub name_prompt: bool,
    pub pause_overlay: bool,
    /// Score shown in the game-over prompt, while it is visible
    pub game_over: Option<u64>,
    pub readout: Readout,
    pub readout_refreshes: usize,
    /// Latest leaderboard listing as `(rank, name, score, highlighted)`
    pub leaderboard: Vec<(usize, String, u64, bool)>,
}

impl HeadlessPresenter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Presenter for HeadlessPresenter {
    fn show_name_prompt(&mut self, _default_name: &str) {
        self.name_prompt = true;
    }

    fn hide_name_prompt(&mut self) {
        self.name_prompt = false;
    }

    fn show_pause_overlay(&mut self) {
        self.pause_overlay = true;
    }

    fn hide_pause_overlay(&mut self) {
        self.pause_overlay = false;
    }

    fn show_game_over(&mut self, score: u64) {
        self.game_over = Some(score);
    }

    fn hide_game_over(&mut self) {
        self.game_over = None;
    }

    fn refresh_readout(&mut self, readout: &Readout) {
        self.readout = *readout;
        self.readout_refreshes += 1;
    }

    fn render_leaderboard(&mut self, board: &Leaderboard, current_player: &str) {
        self.leaderboard = board
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i + 1, e.name.clone(), e.score, e.name == current_player))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("  ada "), "ada");
        assert_eq!(sanitize_name(""), DEFAULT_PLAYER_NAME);
        assert_eq!(sanitize_name(" \t\n"), DEFAULT_PLAYER_NAME);
    }

    #[test]
    fn test_headless_leaderboard_highlights_current() {
        let mut board = Leaderboard::new();
        board.upsert("ada", 5);
        board.upsert("bob", 7);

        let mut presenter = HeadlessPresenter::new();
        presenter.render_leaderboard(&board, "ada");
        assert_eq!(
            presenter.leaderboard,
            vec![
                (1, "bob".to_string(), 7, false),
                (2, "ada".to_string(), 5, true),
            ]
        );
    }
}
