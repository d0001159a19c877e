//! Bullet collision detection and hit effects
//!
//! Each faller kind is resolved in its own pass. Within a pass a bullet
//! consumes at most one target and is gone afterwards; effects are applied
//! once the pass is over, so bullets created by an effect (a volley) are
//! never tested in the pass that created them.

use glam::Vec2;
use rand::Rng;

use super::kinds::{FallerKind, HitEffect};
use super::schedule::Slot;
use super::state::{Bullet, GameEvent, GameState, Particle};

/// Bullet-to-target proximity test
#[inline]
pub fn bullet_hits(bullet: Vec2, target: Vec2, hit_radius: f32) -> bool {
    bullet.distance(target) < hit_radius
}

/// Resolve every bullet against fallers of `kind`. Returns the hit points.
/// Nothing is consumed once the game has left the running phase.
pub fn resolve_kind(state: &mut GameState, kind: FallerKind) -> Vec<Vec2> {
    let mut hits = Vec::new();
    if !state.is_running() {
        return hits;
    }
    let hit_radius = state.spec(kind).hit_radius;
    let anchor = state.spec(kind).anchor;

    let mut i = 0;
    while i < state.bullets_fired.len() {
        let bullet = state.bullets_fired[i].pos;
        let targets = &mut state.fallers[kind.index()];
        match targets
            .iter()
            .position(|t| bullet_hits(bullet, t.anchor(anchor), hit_radius))
        {
            Some(j) => {
                let target = targets.remove(j);
                state.bullets_fired.remove(i);
                hits.push(target.center());
            }
            None => i += 1,
        }
    }

    for &at in &hits {
        apply_hit(state, kind, at);
    }
    hits
}

/// Resolve every faller kind in frame order, stopping at game over
pub fn resolve_all(state: &mut GameState) -> usize {
    let mut total = 0;
    for kind in FallerKind::ALL {
        if !state.is_running() {
            break;
        }
        total += resolve_kind(state, kind).len();
    }
    total
}

/// Apply the effect of a bullet consuming a faller of `kind` at `at`.
/// A finished game takes no further effects.
pub fn apply_hit(state: &mut GameState, kind: FallerKind, at: Vec2) {
    if !state.is_running() {
        return;
    }
    let spec = state.spec(kind).clone();
    burst(state, at, &spec.color);
    state.emit(GameEvent::Hit { kind, at });
    log::debug!("Hit {} at ({:.0}, {:.0})", kind.as_str(), at.x, at.y);

    match spec.effect {
        HitEffect::Score(points) => {
            state.score = state.score.saturating_add(points as u64);
        }
        HitEffect::Heal(amount) => state.heal(amount),
        HitEffect::Volley => fire_volley(state),
        HitEffect::SlowBullets => slow_bullets(state),
        HitEffect::Damage(amount) => {
            state.damage(amount);
            state.check_end();
        }
    }
}

/// Spawn a burst of particles at `at`
pub fn burst(state: &mut GameState, at: Vec2, color: &str) {
    let count = state.tuning.burst_size;
    state.particles.reserve(count);
    for _ in 0..count {
        let rng = &mut state.rng;
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * 4.0,
            (rng.random::<f32>() - 0.5) * 4.0,
        );
        let size = rng.random::<f32>() * 4.0 + 2.0;
        let life = rng.random::<f32>() * 30.0 + 20.0;
        state.particles.push(Particle {
            pos: at,
            vel,
            size,
            life,
            opacity: 1.0,
            color: color.to_string(),
        });
    }
}

/// Fire a full circle of bullets from the attacker at uniform spacing.
/// Volley bullets do not use ammunition.
pub fn fire_volley(state: &mut GameState) {
    let count = state.tuning.volley_size;
    if count == 0 {
        return;
    }
    let origin = state.attacker.pos;
    let speed = state.bullet_speed;
    state.bullets_fired.reserve(count as usize);
    for i in 0..count {
        let angle = i as f32 * std::f32::consts::TAU / count as f32;
        state.bullets_fired.push(Bullet {
            pos: origin,
            vel: crate::direction(angle) * speed,
        });
    }
    state.emit(GameEvent::Volley { bullets: count });
}

/// Divide bullet speed by the power-down factor and schedule the restore.
/// A second hit while slowed restarts the restore delay rather than stacking.
pub fn slow_bullets(state: &mut GameState) {
    state.bullet_speed = state.base_bullet_speed / state.tuning.power_down_factor;
    state
        .triggers
        .start_once(Slot::SpeedRestore, state.tuning.power_down_duration);
    state.emit(GameEvent::BulletSpeedReduced {
        speed: state.bullet_speed,
    });
    log::debug!("Bullet speed reduced to {}", state.bullet_speed);
}

/// Restore bullet speed to the baseline captured at reset
pub fn restore_bullet_speed(state: &mut GameState) {
    state.bullet_speed = state.base_bullet_speed;
    state.emit(GameEvent::BulletSpeedRestored {
        speed: state.bullet_speed,
    });
    log::debug!("Bullet speed restored to {}", state.bullet_speed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Faller, GamePhase};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn running_state() -> GameState {
        let mut state = GameState::new(Tuning::default(), 800.0, 600.0, 5);
        state.start();
        state.drain_events();
        state
    }

    fn put(state: &mut GameState, kind: FallerKind, x: f32, y: f32) {
        state.fallers_mut(kind).push(Faller {
            kind,
            pos: Vec2::new(x, y),
            size: 20.0,
            speed: 0.0,
        });
    }

    fn shoot(state: &mut GameState, x: f32, y: f32) {
        state.bullets_fired.push(Bullet {
            pos: Vec2::new(x, y),
            vel: Vec2::new(0.0, -5.0),
        });
    }

    #[test]
    fn test_enemy_hit_scores_and_bursts() {
        let mut state = running_state();
        shoot(&mut state, 100.0, 100.0);
        put(&mut state, FallerKind::Enemy, 100.0, 95.0);

        let hits = resolve_kind(&mut state, FallerKind::Enemy);
        assert_eq!(hits, vec![Vec2::new(110.0, 105.0)]);
        assert!(state.bullets_fired.is_empty());
        assert!(state.fallers(FallerKind::Enemy).is_empty());
        assert_eq!(state.score, 1);
        assert_eq!(state.particles.len(), 20);
        assert!(state.particles.iter().all(|p| p.color == "#e02626"));
    }

    #[test]
    fn test_miss_leaves_everything() {
        let mut state = running_state();
        shoot(&mut state, 300.0, 300.0);
        put(&mut state, FallerKind::Enemy, 100.0, 95.0);

        assert!(resolve_kind(&mut state, FallerKind::Enemy).is_empty());
        assert_eq!(state.bullets_fired.len(), 1);
        assert_eq!(state.fallers(FallerKind::Enemy).len(), 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_one_bullet_consumes_one_target() {
        let mut state = running_state();
        shoot(&mut state, 100.0, 100.0);
        // Two overlapping enemies in range of the same bullet
        put(&mut state, FallerKind::Enemy, 95.0, 95.0);
        put(&mut state, FallerKind::Enemy, 96.0, 96.0);

        resolve_kind(&mut state, FallerKind::Enemy);
        assert!(state.bullets_fired.is_empty());
        assert_eq!(state.fallers(FallerKind::Enemy).len(), 1);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_adjacent_bullets_are_not_skipped() {
        let mut state = running_state();
        shoot(&mut state, 100.0, 100.0);
        shoot(&mut state, 300.0, 100.0);
        put(&mut state, FallerKind::Enemy, 90.0, 90.0);
        put(&mut state, FallerKind::Enemy, 290.0, 90.0);

        assert_eq!(resolve_kind(&mut state, FallerKind::Enemy).len(), 2);
        assert!(state.bullets_fired.is_empty());
        assert_eq!(state.score, 2);
    }

    #[test]
    fn test_golden_heals_to_cap() {
        let mut state = running_state();
        state.health = 95;
        shoot(&mut state, 100.0, 100.0);
        put(&mut state, FallerKind::GoldenBox, 90.0, 90.0);

        resolve_kind(&mut state, FallerKind::GoldenBox);
        assert_eq!(state.health, 100);
    }

    #[test]
    fn test_health_down_floors_at_zero_and_ends_game() {
        let mut state = running_state();
        state.health = 15;
        shoot(&mut state, 100.0, 100.0);
        put(&mut state, FallerKind::HealthDown, 90.0, 90.0);

        resolve_kind(&mut state, FallerKind::HealthDown);
        assert_eq!(state.health, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_blue_box_fires_volley_not_retested() {
        let mut state = running_state();
        shoot(&mut state, 100.0, 100.0);
        put(&mut state, FallerKind::BlueBox, 90.0, 90.0);
        // Second blue box right on the attacker: volley bullets start there
        put(&mut state, FallerKind::BlueBox, 390.0, 290.0);

        let hits = resolve_kind(&mut state, FallerKind::BlueBox);
        assert_eq!(hits.len(), 1);
        assert_eq!(state.bullets_fired.len(), 360);
        assert_eq!(state.fallers(FallerKind::BlueBox).len(), 1);
        assert_eq!(state.bullets, 5000);
        assert!(state
            .events
            .contains(&GameEvent::Volley { bullets: 360 }));
    }

    #[test]
    fn test_volley_is_uniform() {
        let mut state = running_state();
        fire_volley(&mut state);
        assert_eq!(state.bullets_fired.len(), 360);
        let speed = state.bullet_speed;
        for (i, bullet) in state.bullets_fired.iter().enumerate() {
            assert_eq!(bullet.pos, state.attacker.pos);
            assert!((bullet.vel.length() - speed).abs() < 1e-3);
            let expected = crate::direction(i as f32 * std::f32::consts::TAU / 360.0) * speed;
            assert!((bullet.vel - expected).length() < 1e-3);
        }
    }

    #[test]
    fn test_power_down_slows_then_restores() {
        let mut state = running_state();
        shoot(&mut state, 100.0, 100.0);
        put(&mut state, FallerKind::PowerDown, 90.0, 90.0);

        resolve_kind(&mut state, FallerKind::PowerDown);
        assert_eq!(state.bullet_speed, 1.5);
        assert!(state.triggers.is_active(Slot::SpeedRestore));

        // A second hit does not compound
        slow_bullets(&mut state);
        assert_eq!(state.bullet_speed, 1.5);
        assert_eq!(state.triggers.count(Slot::SpeedRestore), 1);

        restore_bullet_speed(&mut state);
        assert_eq!(state.bullet_speed, 15.0);
    }

    #[test]
    fn test_resolve_all_in_order() {
        let mut state = running_state();
        shoot(&mut state, 100.0, 100.0);
        shoot(&mut state, 300.0, 100.0);
        put(&mut state, FallerKind::Enemy, 90.0, 90.0);
        put(&mut state, FallerKind::HealthDown, 290.0, 90.0);

        assert_eq!(resolve_all(&mut state), 2);
        assert_eq!(state.score, 1);
        assert_eq!(state.health, 80);
    }

    proptest! {
        #[test]
        fn prop_health_and_score_stay_in_bounds(
            start_health in 0u8..=100,
            hits in proptest::collection::vec(0usize..5, 0..60),
        ) {
            let mut state = running_state();
            state.health = start_health;
            for k in hits {
                let kind = FallerKind::ALL[k];
                apply_hit(&mut state, kind, Vec2::new(50.0, 50.0));
                prop_assert!(state.health <= 100);
            }
            prop_assert!(state.score <= 60);
        }

        #[test]
        fn prop_each_hit_removes_one_bullet_and_one_target(
            targets in proptest::collection::vec((0.0f32..500.0, 0.0f32..500.0), 0..20),
            bullets in proptest::collection::vec((0.0f32..500.0, 0.0f32..500.0), 0..20),
        ) {
            let mut state = running_state();
            for &(x, y) in &targets {
                put(&mut state, FallerKind::Enemy, x, y);
            }
            for &(x, y) in &bullets {
                shoot(&mut state, x, y);
            }

            let hits = resolve_kind(&mut state, FallerKind::Enemy).len();
            prop_assert_eq!(state.bullets_fired.len(), bullets.len() - hits);
            prop_assert_eq!(state.fallers(FallerKind::Enemy).len(), targets.len() - hits);
            prop_assert_eq!(state.score, hits as u64);
        }
    }
}
