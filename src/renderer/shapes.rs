//! Geometry and colour helpers for 2D primitives

use glam::Vec2;

use crate::consts::{HEALTH_BAR_WIDTH, HEALTH_BAR_X, HEALTH_BAR_Y, MAX_HEALTH};

/// Axis-aligned rectangle, top-left origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square of side `size` centred on `center`
    pub fn centered(center: Vec2, size: f32) -> Self {
        Self::new(center.x - size / 2.0, center.y - size / 2.0, size, size)
    }
}

/// Health colour at full health
pub const HEALTH_FULL: [u8; 3] = [7, 245, 106];
/// Health colour at zero health
pub const HEALTH_EMPTY: [u8; 3] = [217, 17, 17];

/// Interpolate between two RGB colours; `t` is clamped to [0, 1]
pub fn interpolate_rgb(from: [u8; 3], to: [u8; 3], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let mut out = [0u8; 3];
    for (i, channel) in out.iter_mut().enumerate() {
        *channel = crate::lerp(from[i] as f32, to[i] as f32, t).round() as u8;
    }
    out
}

pub fn css_rgb(rgb: [u8; 3]) -> String {
    format!("rgb({}, {}, {})", rgb[0], rgb[1], rgb[2])
}

/// Health bar colour: green when full, red when empty
pub fn health_color(health: u8) -> [u8; 3] {
    let factor = health.min(MAX_HEALTH) as f32 / MAX_HEALTH as f32;
    interpolate_rgb(HEALTH_FULL, HEALTH_EMPTY, 1.0 - factor)
}

/// Health bar layout: the full-height frame and the filled part, which
/// shrinks from the top as health drops
pub fn health_bar(health: u8, field_height: f32) -> (Rect, Rect) {
    let max_height = field_height / 5.0;
    let factor = health.min(MAX_HEALTH) as f32 / MAX_HEALTH as f32;
    let height = max_height * factor;
    let frame = Rect::new(HEALTH_BAR_X, HEALTH_BAR_Y, HEALTH_BAR_WIDTH, max_height);
    let fill = Rect::new(
        HEALTH_BAR_X,
        HEALTH_BAR_Y + (max_height - height),
        HEALTH_BAR_WIDTH,
        height,
    );
    (frame, fill)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_color_endpoints() {
        assert_eq!(health_color(100), HEALTH_FULL);
        assert_eq!(health_color(0), HEALTH_EMPTY);
        assert_eq!(health_color(50), [112, 131, 62]);
        assert_eq!(css_rgb(health_color(100)), "rgb(7, 245, 106)");
    }

    #[test]
    fn test_health_bar_shrinks_from_top() {
        let (frame, fill) = health_bar(25, 500.0);
        assert_eq!(frame, Rect::new(10.0, 10.0, 10.0, 100.0));
        assert_eq!(fill, Rect::new(10.0, 85.0, 10.0, 25.0));

        let (_, empty) = health_bar(0, 500.0);
        assert_eq!(empty.h, 0.0);
    }

    #[test]
    fn test_centered_rect() {
        let rect = Rect::centered(Vec2::new(50.0, 50.0), 20.0);
        assert_eq!(rect, Rect::new(40.0, 40.0, 20.0, 20.0));
    }
}
