//! Turret Blitz - a single-screen turret shooter
//!
//! Core modules:
//! - `sim`: Host-agnostic simulation (entities, spawners, collisions, timers)
//! - `session`: Binds a simulation to leaderboard, presenter and audio
//! - `renderer`: Draws a frame onto any 2D `Surface`
//! - `platform`: Presentation collaborators (headless and browser)
//! - `persistence`: Leaderboard storage backends
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod headless;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{Leaderboard, LeaderboardEntry};
pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Reference frame rate the per-frame speeds are expressed in
    pub const FRAME_RATE: f32 = 60.0;
    /// Fixed simulation timestep (one reference frame)
    pub const SIM_DT: f32 = 1.0 / FRAME_RATE;
    /// Maximum substeps per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Health is always within [0, MAX_HEALTH]
    pub const MAX_HEALTH: u8 = 100;

    /// Health bar geometry (left gutter of the playfield)
    pub const HEALTH_BAR_X: f32 = 10.0;
    pub const HEALTH_BAR_Y: f32 = 10.0;
    pub const HEALTH_BAR_WIDTH: f32 = 10.0;

    /// Number of drifting background particles
    pub const BACKGROUND_PARTICLES: usize = 50;

    /// Minimum interval between HUD readout refreshes (seconds)
    pub const READOUT_INTERVAL: f32 = 0.2;

    /// Fallback display name when the player enters nothing
    pub const DEFAULT_PLAYER_NAME: &str = "Anonymous";
}

/// Angle (radians) of the vector pointing from `from` to `to`
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector for an angle (radians)
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_angle_to() {
        let origin = Vec2::new(100.0, 100.0);
        assert!(angle_to(origin, Vec2::new(200.0, 100.0)).abs() < 1e-6);
        assert!((angle_to(origin, Vec2::new(100.0, 200.0)) - FRAC_PI_2).abs() < 1e-6);
        assert!((angle_to(origin, Vec2::new(0.0, 100.0)) - PI).abs() < 1e-6);
    }

    #[test]
    fn test_direction_is_unit() {
        for i in 0..16 {
            let a = i as f32 * 0.4;
            assert!((direction(a).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(3.0, 5.0, 0.0), 3.0);
        assert_eq!(lerp(3.0, 5.0, 1.0), 5.0);
        assert_eq!(lerp(3.0, 5.0, 0.5), 4.0);
    }
}
