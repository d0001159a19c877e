//! Simulation tick
//!
//! The host calls [`tick`] once per display refresh (or per test step) with
//! the input gathered since the last call and the elapsed time. The tick
//! applies input, advances every trigger, then runs one frame pass when the
//! game is running.

use glam::Vec2;

use super::collision;
use super::kinds::FallerKind;
use super::motion;
use super::schedule::{Fired, Slot};
use super::spawn;
use super::state::{Bullet, GameEvent, GamePhase, GameState};
use crate::consts::FRAME_RATE;

/// Input gathered for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in playfield coordinates
    pub pointer: Option<Vec2>,
    /// Fire input went down
    pub fire_pressed: bool,
    /// Fire input went up
    pub fire_released: bool,
    /// Pause toggle
    pub pause: bool,
    /// New playfield size
    pub resize: Option<(f32, f32)>,
}

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    /// The run is over; the loop restarts after a reset
    Stop,
}

/// Advance the game by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> LoopControl {
    apply_input(state, input);

    for fired in state.triggers.advance(dt) {
        // A handler earlier in this batch may have cancelled or replaced it.
        // Fired one-shots are already gone, so only a replacement makes them stale.
        let stale = if fired.slot == Slot::SpeedRestore {
            state.triggers.is_active(Slot::SpeedRestore)
        } else {
            !state.triggers.is_current(fired)
        };
        if !stale {
            dispatch(state, fired);
        }
    }

    // Paused or over: keep the loop alive but skip simulation work
    if state.phase == GamePhase::Running {
        step_frame(state, dt * FRAME_RATE);
    }

    if state.phase == GamePhase::GameOver {
        LoopControl::Stop
    } else {
        LoopControl::Continue
    }
}

/// Apply one tick of input
pub fn apply_input(state: &mut GameState, input: &TickInput) {
    if let Some((width, height)) = input.resize {
        state.resize(width, height);
    }
    if let Some(pointer) = input.pointer {
        state.pointer = pointer;
    }
    if input.pause {
        state.toggle_pause();
    }
    if input.fire_pressed {
        press_fire(state);
    }
    if input.fire_released {
        release_fire(state);
    }
}

/// Run the handler for a trigger that came due
pub fn dispatch(state: &mut GameState, fired: Fired) {
    match fired.slot {
        Slot::Countdown => countdown(state),
        Slot::Spawn(kind) => {
            spawn::spawn(state, kind);
        }
        Slot::AutoFire => {
            if !fire_bullet(state) {
                state.triggers.cancel(Slot::AutoFire);
                state.firing = false;
            }
        }
        Slot::SpeedRestore => collision::restore_bullet_speed(state),
    }
}

/// One countdown step
pub fn countdown(state: &mut GameState) {
    if state.phase != GamePhase::Running {
        return;
    }
    state.time_left = state.time_left.saturating_sub(1);
    state.emit(GameEvent::TimeTick {
        time_left: state.time_left,
    });
    if state.time_left == 0 {
        state.triggers.cancel(Slot::Countdown);
    }
    state.check_end();
}

/// One frame pass over every entity collection, in fixed order.
/// The pass ends where the game does: nothing after a fatal breach runs.
pub fn step_frame(state: &mut GameState, frames: f32) {
    state.frame += 1;

    motion::step_background(state, frames);
    state.attacker.angle = crate::angle_to(state.attacker.pos, state.pointer);

    motion::step_bullets(state, frames);
    for kind in FallerKind::ALL {
        motion::step_fallers(state, kind, frames);
        if !state.is_running() {
            return;
        }
    }
    motion::step_particles(state, frames);

    collision::resolve_all(state);
    state.check_end();
}

/// Fire input went down: shoot now and keep shooting while held
pub fn press_fire(state: &mut GameState) {
    if state.phase != GamePhase::Running || state.firing || state.bullets == 0 {
        return;
    }
    state.firing = true;
    fire_bullet(state);
    if state.bullets > 0 {
        state
            .triggers
            .start_periodic(Slot::AutoFire, state.tuning.fire_interval);
    }
}

/// Fire input went up
pub fn release_fire(state: &mut GameState) {
    state.firing = false;
    state.triggers.cancel(Slot::AutoFire);
}

/// Fire one aimed bullet. Returns false when nothing could be fired.
pub fn fire_bullet(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Running {
        return false;
    }
    if state.bullets == 0 {
        state.emit(GameEvent::OutOfAmmo);
        return false;
    }

    let origin = state.attacker.pos;
    let angle = crate::angle_to(origin, state.pointer);
    state.bullets_fired.push(Bullet {
        pos: origin,
        vel: crate::direction(angle) * state.bullet_speed,
    });
    state.bullets -= 1;
    state.emit(GameEvent::Fired);
    true
}
