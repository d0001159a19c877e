//! Motion step: advance positions and cull what leaves the playfield
//!
//! Velocities are expressed per reference frame; `frames` scales them for
//! the elapsed time of the step (1.0 at the reference frame rate).

use rand::Rng;

use super::kinds::FallerKind;
use super::state::{BackgroundParticle, GameEvent, GameState};

/// Move bullets and drop any that left the playfield in any direction
pub fn step_bullets(state: &mut GameState, frames: f32) {
    let field = state.playfield;
    state.bullets_fired.retain_mut(|bullet| {
        bullet.pos += bullet.vel * frames;
        field.contains(bullet.pos)
    });
}

/// Move fallers of `kind` down. Those crossing the bottom edge are removed;
/// kinds with breach damage hurt the player on the way out.
/// Returns how many breached.
pub fn step_fallers(state: &mut GameState, kind: FallerKind, frames: f32) -> usize {
    let bottom = state.playfield.height;
    let breach_damage = state.spec(kind).breach_damage;

    let mut crossed = 0;
    state.fallers_mut(kind).retain_mut(|faller| {
        faller.pos.y += faller.speed * frames;
        if faller.pos.y > bottom {
            crossed += 1;
            false
        } else {
            true
        }
    });

    if let Some(damage) = breach_damage {
        for _ in 0..crossed {
            state.damage(damage);
            state.emit(GameEvent::Breach {
                health: state.health,
            });
            if state.health == 0 {
                break;
            }
        }
        state.check_end();
    }
    crossed
}

/// Age hit-burst particles: move, fade, shrink, expire
pub fn step_particles(state: &mut GameState, frames: f32) {
    let shrink = 0.95_f32.powf(frames);
    state.particles.retain_mut(|p| {
        p.pos += p.vel * frames;
        p.opacity -= 0.02 * frames;
        p.life -= frames;
        p.size *= shrink;
        p.is_alive()
    });
}

/// Drift the background decoration, re-seeding anything that wanders off
pub fn step_background(state: &mut GameState, frames: f32) {
    let field = state.playfield;
    let rng = &mut state.rng;
    for p in &mut state.background {
        p.pos += p.vel * frames;
        if p.pos.x > field.width || p.pos.x < 0.0 {
            p.pos.x = rng.random::<f32>() * field.width;
        }
        if p.pos.y > field.height || p.pos.y < 0.0 {
            p.pos.y = rng.random::<f32>() * field.height;
        }
    }
}

/// Re-seed the whole background (used after a resize)
pub fn reseed_background(state: &mut GameState) {
    let field = state.playfield;
    let rng = &mut state.rng;
    for p in &mut state.background {
        *p = BackgroundParticle::random(rng, &field);
    }
}
