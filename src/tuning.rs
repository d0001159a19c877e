//! Data-driven game balance
//!
//! Every gameplay constant lives here so a session can be re-balanced from a
//! JSON file without touching the simulation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_HEALTH;
use crate::persistence::StorageError;
use crate::sim::kinds::{FallerKind, FallerSpec};

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Starting ammunition
    pub bullets: u32,
    /// Countdown length in seconds
    pub time_limit: u32,
    /// Starting health (clamped to the maximum)
    pub health: u8,
    /// Bullet speed in pixels per frame; also the power-down baseline
    pub bullet_speed: f32,
    /// Seconds between shots while fire is held
    pub fire_interval: f32,
    /// Bullets in a blue-box volley
    pub volley_size: u32,
    /// Bullet speed divisor applied by a power-down hit
    pub power_down_factor: f32,
    /// Seconds until the bullet speed is restored
    pub power_down_duration: f32,
    /// Seconds per countdown step
    pub timer_period: f32,
    /// Attacker body radius
    pub attacker_radius: f32,
    /// Particles per burst
    pub burst_size: usize,
    /// Gutter kept free of spawns on the left (health bar)
    pub spawn_margin_left: f32,
    /// Gutter kept free of spawns on the right (leaderboard panel)
    pub spawn_margin_right: f32,

    pub enemy: FallerSpec,
    pub golden_box: FallerSpec,
    pub blue_box: FallerSpec,
    pub power_down: FallerSpec,
    pub health_down: FallerSpec,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            bullets: 5000,
            time_limit: 100,
            health: MAX_HEALTH,
            bullet_speed: 15.0,
            fire_interval: 0.1,
            volley_size: 360,
            power_down_factor: 10.0,
            power_down_duration: 5.0,
            timer_period: 1.0,
            attacker_radius: 15.0,
            burst_size: 20,
            spawn_margin_left: 20.0,
            spawn_margin_right: 300.0,
            enemy: FallerSpec::enemy(),
            golden_box: FallerSpec::golden_box(),
            blue_box: FallerSpec::blue_box(),
            power_down: FallerSpec::power_down(),
            health_down: FallerSpec::health_down(),
        }
    }
}

impl Tuning {
    /// Spec for a faller kind
    pub fn spec(&self, kind: FallerKind) -> &FallerSpec {
        match kind {
            FallerKind::Enemy => &self.enemy,
            FallerKind::GoldenBox => &self.golden_box,
            FallerKind::BlueBox => &self.blue_box,
            FallerKind::PowerDown => &self.power_down,
            FallerKind::HealthDown => &self.health_down,
        }
    }

    /// Clamp values that would break the simulation
    pub fn sanitized(mut self) -> Self {
        self.health = self.health.min(MAX_HEALTH);
        self.time_limit = self.time_limit.max(1);
        self.bullet_speed = self.bullet_speed.max(0.1);
        self.fire_interval = self.fire_interval.max(0.01);
        self.power_down_factor = self.power_down_factor.max(1.0);
        self.power_down_duration = self.power_down_duration.max(0.0);
        self.timer_period = self.timer_period.max(0.01);
        for spec in [
            &mut self.enemy,
            &mut self.golden_box,
            &mut self.blue_box,
            &mut self.power_down,
            &mut self.health_down,
        ] {
            spec.size = spec.size.max(1.0);
            spec.spawn_period = spec.spawn_period.max(0.01);
            spec.hit_radius = spec.hit_radius.max(0.0);
        }
        self
    }

    /// Parse tuning from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Load tuning from a JSON file
    pub fn load_from(path: &Path) -> Result<Self, StorageError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::kinds::HitEffect;

    #[test]
    fn test_defaults_match_kinds() {
        let tuning = Tuning::default();
        for kind in FallerKind::ALL {
            assert_eq!(tuning.spec(kind), &FallerSpec::for_kind(kind));
        }
        assert_eq!(tuning.spec(FallerKind::BlueBox).effect, HitEffect::Volley);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "time_limit": 10, "bullets": 3 }"#).unwrap();
        assert_eq!(tuning.time_limit, 10);
        assert_eq!(tuning.bullets, 3);
        assert_eq!(tuning.health, 100);
        assert_eq!(tuning.enemy, FallerSpec::enemy());
    }

    #[test]
    fn test_sanitize_clamps() {
        let tuning = Tuning::from_json(r#"{ "health": 250, "time_limit": 0, "power_down_factor": 0.0 }"#)
            .unwrap();
        assert_eq!(tuning.health, 100);
        assert_eq!(tuning.time_limit, 1);
        assert_eq!(tuning.power_down_factor, 1.0);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }
}
