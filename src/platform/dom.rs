//! Browser page presenter
//!
//! Works against elements that the host page provides:
//! `namePopup`, `playerNameInput`, `pauseOverlay`, `overPopup`,
//! `finalScore`, `score`, `bulletCount`, `timer`, `leaderboardList`.
//! Missing elements are skipped.

use web_sys::{Document, Element, HtmlInputElement};
use wasm_bindgen::JsCast;

use super::{Presenter, Readout};
use crate::highscores::Leaderboard;

const ACTIVE: &str = "active";

/// Presenter backed by the page DOM
pub struct DomPresenter {
    document: Document,
}

impl DomPresenter {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn element(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn set_active(&self, id: &str, active: bool) {
        if let Some(el) = self.element(id) {
            let classes = el.class_list();
            let _ = if active {
                classes.add_1(ACTIVE)
            } else {
                classes.remove_1(ACTIVE)
            };
        }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.element(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Current contents of the name input
    pub fn entered_name(&self) -> String {
        self.element("playerNameInput")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default()
    }
}

impl Presenter for DomPresenter {
    fn show_name_prompt(&mut self, default_name: &str) {
        if let Some(input) = self
            .element("playerNameInput")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(default_name);
            let _ = input.focus();
        }
        self.set_active("namePopup", true);
    }

    fn hide_name_prompt(&mut self) {
        self.set_active("namePopup", false);
    }

    fn show_pause_overlay(&mut self) {
        self.set_active("pauseOverlay", true);
    }

    fn hide_pause_overlay(&mut self) {
        self.set_active("pauseOverlay", false);
    }

    fn show_game_over(&mut self, score: u64) {
        self.set_text("finalScore", &format!("Game Over! Your score: {score}"));
        self.set_active("overPopup", true);
    }

    fn hide_game_over(&mut self) {
        self.set_active("overPopup", false);
    }

    fn refresh_readout(&mut self, readout: &Readout) {
        self.set_text("score", &format!("Score: {}", readout.score));
        self.set_text("bulletCount", &format!("Bullets: {}", readout.bullets));
        self.set_text("timer", &format!("Time: {}", readout.time_left));
    }

    fn render_leaderboard(&mut self, board: &Leaderboard, current_player: &str) {
        let Some(list) = self.element("leaderboardList") else {
            return;
        };
        let html: String = board
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let class = if entry.name == current_player {
                    " class=\"current\""
                } else {
                    ""
                };
                format!(
                    "<li{class}><span>{}. {}</span><span>{}</span></li>",
                    i + 1,
                    escape_html(&entry.name),
                    entry.score
                )
            })
            .collect();
        list.set_inner_html(&html);
    }
}

/// Player names are free text
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
