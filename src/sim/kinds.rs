//! Falling collidables
//!
//! Enemies and every pickup share one behaviour: they spawn above the top
//! edge on a fixed period, fall straight down, and are consumed by a bullet.
//! What differs between them is data, described by a [`FallerSpec`].

use serde::{Deserialize, Serialize};

use crate::lerp;

/// Every kind of falling entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FallerKind {
    Enemy,
    GoldenBox,
    BlueBox,
    PowerDown,
    HealthDown,
}

impl FallerKind {
    pub const COUNT: usize = 5;

    /// Update and collision order used by the frame pass
    pub const ALL: [FallerKind; Self::COUNT] = [
        FallerKind::Enemy,
        FallerKind::GoldenBox,
        FallerKind::BlueBox,
        FallerKind::PowerDown,
        FallerKind::HealthDown,
    ];

    /// Stable index into per-kind arrays
    pub fn index(self) -> usize {
        match self {
            FallerKind::Enemy => 0,
            FallerKind::GoldenBox => 1,
            FallerKind::BlueBox => 2,
            FallerKind::PowerDown => 3,
            FallerKind::HealthDown => 4,
        }
    }

    pub fn is_pickup(self) -> bool {
        self != FallerKind::Enemy
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FallerKind::Enemy => "enemy",
            FallerKind::GoldenBox => "golden box",
            FallerKind::BlueBox => "blue box",
            FallerKind::PowerDown => "power-down",
            FallerKind::HealthDown => "health-down",
        }
    }
}

/// How fast a faller descends (pixels per reference frame)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FallSpeed {
    Fixed(f32),
    /// Interpolates from `min` at full time to `max` when time runs out
    TimeScaled { min: f32, max: f32 },
}

impl FallSpeed {
    /// Speed for the given fraction of remaining time (1.0 = full clock)
    pub fn at(&self, time_fraction: f32) -> f32 {
        match *self {
            FallSpeed::Fixed(speed) => speed,
            FallSpeed::TimeScaled { min, max } => {
                let t = time_fraction.clamp(0.0, 1.0);
                lerp(min, max, 1.0 - t)
            }
        }
    }
}

/// What happens when a bullet consumes a faller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HitEffect {
    /// Add to the score
    Score(u32),
    /// Restore health (capped at the maximum)
    Heal(u8),
    /// Fire a full circle of bullets from the attacker
    Volley,
    /// Divide bullet speed by the power-down factor for a while
    SlowBullets,
    /// Remove health (floored at zero)
    Damage(u8),
}

/// Point of a faller that bullet distance is measured to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitAnchor {
    /// Top-left corner of the bounding square
    Corner,
    #[default]
    Center,
}

/// Data describing one faller kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallerSpec {
    /// Side length of the bounding square (pixels)
    pub size: f32,
    pub speed: FallSpeed,
    /// Seconds between spawn attempts
    pub spawn_period: f32,
    /// Maximum live count (None = uncapped)
    pub cap: Option<usize>,
    /// Entities inserted per successful spawn attempt (still bounded by cap)
    pub batch: usize,
    /// Bullet-to-anchor distance that counts as a hit
    pub hit_radius: f32,
    #[serde(default)]
    pub anchor: HitAnchor,
    pub effect: HitEffect,
    /// Health lost when this kind crosses the bottom edge (None = silently culled)
    pub breach_damage: Option<u8>,
    /// Colour used for the body and its particle burst
    pub color: String,
}

impl FallerSpec {
    pub fn enemy() -> Self {
        Self {
            size: 20.0,
            speed: FallSpeed::TimeScaled { min: 3.0, max: 5.0 },
            spawn_period: 0.1,
            cap: None,
            batch: 1,
            hit_radius: 20.0,
            anchor: HitAnchor::Corner,
            effect: HitEffect::Score(1),
            breach_damage: Some(1),
            color: "#e02626".into(),
        }
    }

    pub fn golden_box() -> Self {
        Self {
            size: 20.0,
            speed: FallSpeed::Fixed(10.0),
            spawn_period: 5.0,
            cap: Some(3),
            batch: 3,
            hit_radius: 20.0,
            anchor: HitAnchor::Center,
            effect: HitEffect::Heal(10),
            breach_damage: None,
            color: "gold".into(),
        }
    }

    pub fn blue_box() -> Self {
        Self {
            size: 20.0,
            speed: FallSpeed::Fixed(7.0),
            spawn_period: 5.0,
            cap: Some(3),
            batch: 1,
            hit_radius: 20.0,
            anchor: HitAnchor::Center,
            effect: HitEffect::Volley,
            breach_damage: None,
            color: "dodgerblue".into(),
        }
    }

    pub fn power_down() -> Self {
        Self {
            size: 20.0,
            speed: FallSpeed::Fixed(2.0),
            spawn_period: 10.0,
            cap: Some(2),
            batch: 1,
            hit_radius: 20.0,
            anchor: HitAnchor::Center,
            effect: HitEffect::SlowBullets,
            breach_damage: None,
            color: "white".into(),
        }
    }

    pub fn health_down() -> Self {
        Self {
            size: 20.0,
            speed: FallSpeed::Fixed(5.0),
            spawn_period: 5.0,
            cap: Some(2),
            batch: 1,
            hit_radius: 20.0,
            anchor: HitAnchor::Center,
            effect: HitEffect::Damage(20),
            breach_damage: None,
            color: "lime".into(),
        }
    }

    /// Default spec for a kind
    pub fn for_kind(kind: FallerKind) -> Self {
        match kind {
            FallerKind::Enemy => Self::enemy(),
            FallerKind::GoldenBox => Self::golden_box(),
            FallerKind::BlueBox => Self::blue_box(),
            FallerKind::PowerDown => Self::power_down(),
            FallerKind::HealthDown => Self::health_down(),
        }
    }

    /// How many entities a spawn attempt may add given the current population
    pub fn spawn_room(&self, live: usize) -> usize {
        match self.cap {
            Some(cap) => self.batch.min(cap.saturating_sub(live)),
            None => self.batch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_order() {
        for (i, kind) in FallerKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_time_scaled_speed_is_monotonic() {
        let speed = FallSpeed::TimeScaled { min: 3.0, max: 5.0 };
        assert_eq!(speed.at(1.0), 3.0);
        assert_eq!(speed.at(0.0), 5.0);
        assert_eq!(speed.at(0.5), 4.0);
        // Out-of-range fractions clamp to the endpoints
        assert_eq!(speed.at(2.0), 3.0);
        assert_eq!(speed.at(-1.0), 5.0);

        let mut last = speed.at(1.0);
        for i in (0..=10).rev() {
            let s = speed.at(i as f32 / 10.0);
            assert!(s >= last);
            last = s;
        }
    }

    #[test]
    fn test_spawn_room_respects_cap() {
        let golden = FallerSpec::golden_box();
        assert_eq!(golden.spawn_room(0), 3);
        assert_eq!(golden.spawn_room(1), 2);
        assert_eq!(golden.spawn_room(3), 0);
        assert_eq!(golden.spawn_room(7), 0);

        let enemy = FallerSpec::enemy();
        assert_eq!(enemy.spawn_room(10_000), 1);
    }
}
