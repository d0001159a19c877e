//! Simulation module
//!
//! All gameplay logic lives here. This module stays host-agnostic:
//! - Time only advances through `tick`
//! - Seeded RNG only
//! - Entity collections are processed in a fixed order
//! - No rendering, audio or storage dependencies

pub mod collision;
pub mod kinds;
pub mod motion;
pub mod schedule;
pub mod spawn;
pub mod state;
pub mod tick;

pub use kinds::{FallSpeed, FallerKind, FallerSpec, HitAnchor, HitEffect};
pub use schedule::{Fired, Slot, TriggerId, Triggers};
pub use state::{
    Attacker, BackgroundParticle, Bullet, Faller, GameEvent, GamePhase, GameState, Particle,
    Playfield,
};
pub use tick::{LoopControl, TickInput, tick};
