//! Surface that records draw calls

use glam::Vec2;

use super::{Rect, Sprite, Surface};

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(String),
    Circle {
        center: Vec2,
        radius: f32,
        color: String,
        alpha: f32,
    },
    FillRect(Rect, String),
    StrokeRect(Rect, String),
    Sprite(Sprite, Rect),
}

/// Surface for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub width: f32,
    pub height: f32,
    pub commands: Vec<DrawCmd>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Number of circles drawn since the last clear
    pub fn circles(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCmd::Circle { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: &str) {
        self.commands.clear();
        self.commands.push(DrawCmd::Clear(color.to_string()));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str, alpha: f32) {
        self.commands.push(DrawCmd::Circle {
            center,
            radius,
            color: color.to_string(),
            alpha,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.commands.push(DrawCmd::FillRect(rect, color.to_string()));
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str) {
        self.commands.push(DrawCmd::StrokeRect(rect, color.to_string()));
    }

    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect) {
        self.commands.push(DrawCmd::Sprite(sprite, rect));
    }
}
