//! Spawners for enemies and pickups

use glam::Vec2;
use rand::Rng;

use super::kinds::FallerKind;
use super::state::{Faller, GameEvent, GamePhase, GameState};

/// Horizontal range a faller of `size` may spawn in, as `(min_x, max_x)`.
/// Collapses to a single point when the playfield is narrower than the gutters.
pub fn spawn_range(state: &GameState, size: f32) -> (f32, f32) {
    let min_x = state.tuning.spawn_margin_left;
    let max_x = state.playfield.width - state.tuning.spawn_margin_right - size;
    if max_x > min_x {
        (min_x, max_x)
    } else {
        let x = min_x.min((state.playfield.width - size).max(0.0));
        (x, x)
    }
}

/// One spawn attempt for `kind`. Returns how many fallers were added.
///
/// Nothing spawns unless the game is running, and capped kinds never exceed
/// their cap, even for batch spawns.
pub fn spawn(state: &mut GameState, kind: FallerKind) -> usize {
    if state.phase != GamePhase::Running {
        return 0;
    }

    let spec = state.spec(kind).clone();
    let room = spec.spawn_room(state.fallers(kind).len());
    if room == 0 {
        return 0;
    }

    let (min_x, max_x) = spawn_range(state, spec.size);
    let speed = spec.speed.at(state.time_fraction());

    for _ in 0..room {
        let x = if max_x > min_x {
            state.rng.random_range(min_x..max_x)
        } else {
            min_x
        };
        state.fallers_mut(kind).push(Faller {
            kind,
            pos: Vec2::new(x, -spec.size),
            size: spec.size,
            speed,
        });
    }

    if kind.is_pickup() {
        log::debug!("Spawned {} x{}", kind.as_str(), room);
        state.emit(GameEvent::Spawned { kind });
    }
    room
}
