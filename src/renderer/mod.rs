//! Frame rendering
//!
//! The renderer draws a [`GameState`] onto any [`Surface`]. The browser host
//! provides a canvas 2D surface; tests use [`RecordingSurface`].

#[cfg(target_arch = "wasm32")]
mod canvas;
mod recording;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use recording::{DrawCmd, RecordingSurface};
pub use shapes::Rect;

use glam::Vec2;

use crate::settings::Settings;
use crate::sim::{FallerKind, GameState};

/// Playfield background
pub const BACKGROUND_COLOR: &str = "#0b0b1a";
pub const ATTACKER_COLOR: &str = "#3498db";
/// Drawn size of the bullet sprite
pub const BULLET_SPRITE_SIZE: f32 = 20.0;

/// Bitmap sprites a surface knows how to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Bullet,
}

/// A 2D drawing target
pub trait Surface {
    /// Drawable size in pixels
    fn size(&self) -> (f32, f32);
    fn clear(&mut self, color: &str);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str, alpha: f32);
    fn fill_rect(&mut self, rect: Rect, color: &str);
    fn stroke_rect(&mut self, rect: Rect, color: &str);
    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect);
}

/// Draw one complete frame
pub fn draw_frame(state: &GameState, settings: &Settings, surface: &mut dyn Surface) {
    surface.clear(BACKGROUND_COLOR);

    if settings.background {
        for p in &state.background {
            surface.fill_circle(p.pos, p.size, "white", p.opacity);
        }
    }

    if settings.health_bar {
        let (frame, fill) = shapes::health_bar(state.health, state.playfield.height);
        surface.fill_rect(frame, "black");
        if fill.h > 0.0 {
            let color = shapes::css_rgb(shapes::health_color(state.health));
            surface.fill_rect(fill, &color);
        }
        surface.stroke_rect(frame, "white");
    }

    surface.fill_circle(
        state.attacker.pos,
        state.attacker.radius,
        ATTACKER_COLOR,
        1.0,
    );

    for bullet in &state.bullets_fired {
        surface.draw_sprite(
            Sprite::Bullet,
            Rect::centered(bullet.pos, BULLET_SPRITE_SIZE),
        );
    }

    for kind in FallerKind::ALL {
        let color = &state.spec(kind).color;
        for faller in state.fallers(kind) {
            surface.fill_rect(
                Rect::new(faller.pos.x, faller.pos.y, faller.size, faller.size),
                color,
            );
        }
    }

    if settings.particles {
        for p in &state.particles {
            surface.fill_circle(p.pos, p.size, &p.color, p.opacity.clamp(0.0, 1.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Bullet, Faller};
    use crate::tuning::Tuning;

    fn scene() -> GameState {
        let mut state = GameState::new(Tuning::default(), 800.0, 600.0, 5);
        state.start();
        state.bullets_fired.push(Bullet {
            pos: Vec2::new(100.0, 100.0),
            vel: Vec2::ZERO,
        });
        state.fallers_mut(FallerKind::GoldenBox).push(Faller {
            kind: FallerKind::GoldenBox,
            pos: Vec2::new(200.0, 50.0),
            size: 20.0,
            speed: 10.0,
        });
        state
    }

    #[test]
    fn test_frame_draws_every_layer() {
        let state = scene();
        let mut surface = RecordingSurface::new(800.0, 600.0);
        draw_frame(&state, &Settings::default(), &mut surface);

        assert_eq!(surface.commands[0], DrawCmd::Clear(BACKGROUND_COLOR.into()));
        assert_eq!(surface.circles(), state.background.len() + 1);
        assert!(surface.commands.contains(&DrawCmd::Sprite(
            Sprite::Bullet,
            Rect::new(90.0, 90.0, 20.0, 20.0)
        )));
        let golden = &state.spec(FallerKind::GoldenBox).color;
        assert!(surface.commands.contains(&DrawCmd::FillRect(
            Rect::new(200.0, 50.0, 20.0, 20.0),
            golden.clone()
        )));
        assert!(surface
            .commands
            .contains(&DrawCmd::FillRect(Rect::new(10.0, 10.0, 10.0, 120.0), "rgb(7, 245, 106)".into())));
    }

    #[test]
    fn test_settings_hide_optional_layers() {
        let state = scene();
        let settings = Settings {
            background: false,
            health_bar: false,
            particles: false,
            ..Default::default()
        };
        let mut surface = RecordingSurface::new(800.0, 600.0);
        draw_frame(&state, &settings, &mut surface);

        // Attacker only
        assert_eq!(surface.circles(), 1);
        assert!(!surface
            .commands
            .iter()
            .any(|c| matches!(c, DrawCmd::StrokeRect(..))));
    }
}
