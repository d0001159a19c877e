//! Game state and core simulation types
//!
//! Everything a frame reads or mutates lives in [`GameState`]. Spawners,
//! the countdown and the loop driver all receive it by `&mut`; nothing is
//! shared through globals.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::kinds::{FallerKind, FallerSpec, HitAnchor};
use super::schedule::{Slot, Triggers};
use crate::consts::{BACKGROUND_PARTICLES, MAX_HEALTH};
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for the player to enter a name
    Idle,
    /// Active gameplay
    Running,
    /// Game is paused; countdown stopped
    Paused,
    /// Session ended
    GameOver,
}

/// Playfield bounds (drawing surface size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Inclusive containment test used for bullet culling
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.x <= self.width && pos.y >= 0.0 && pos.y <= self.height
    }
}

/// The player's turret
#[derive(Debug, Clone, PartialEq)]
pub struct Attacker {
    pub pos: Vec2,
    pub radius: f32,
    /// Facing angle (radians), towards the pointer
    pub angle: f32,
}

/// A projectile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bullet {
    pub pos: Vec2,
    /// Pixels per reference frame
    pub vel: Vec2,
}

/// An enemy or pickup falling from the top edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Faller {
    pub kind: FallerKind,
    /// Top-left corner of the bounding square
    pub pos: Vec2,
    pub size: f32,
    /// Pixels per reference frame
    pub speed: f32,
}

impl Faller {
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    /// Point that bullet distance is measured to
    pub fn anchor(&self, anchor: HitAnchor) -> Vec2 {
        match anchor {
            HitAnchor::Corner => self.pos,
            HitAnchor::Center => self.center(),
        }
    }
}

/// A particle from a hit burst
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Frames left to live
    pub life: f32,
    pub opacity: f32,
    pub color: String,
}

/// Particles smaller than this are removed
pub const PARTICLE_MIN_SIZE: f32 = 0.5;

impl Particle {
    pub fn is_alive(&self) -> bool {
        self.life > 0.0 && self.opacity > 0.0 && self.size >= PARTICLE_MIN_SIZE
    }
}

/// Faint drifting decoration behind the playfield
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub opacity: f32,
}

impl BackgroundParticle {
    pub fn random(rng: &mut Pcg32, field: &Playfield) -> Self {
        Self {
            pos: Vec2::new(
                rng.random::<f32>() * field.width,
                rng.random::<f32>() * field.height,
            ),
            vel: Vec2::new(
                rng.random::<f32>() * 0.5 - 0.25,
                rng.random::<f32>() * 0.5 - 0.25,
            ),
            size: rng.random::<f32>() * 2.0 + 1.0,
            opacity: rng.random::<f32>() * 0.5 + 0.2,
        }
    }
}

/// Notable things that happened during a tick, drained by the session
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    Reset,
    /// A single aimed shot
    Fired,
    /// A blue-box volley
    Volley { bullets: u32 },
    /// Auto-fire stopped because the magazine is empty
    OutOfAmmo,
    /// A faller was created
    Spawned { kind: FallerKind },
    /// A bullet consumed a faller
    Hit { kind: FallerKind, at: Vec2 },
    /// An enemy crossed the bottom edge
    Breach { health: u8 },
    /// Countdown stepped
    TimeTick { time_left: u32 },
    BulletSpeedReduced { speed: f32 },
    BulletSpeedRestored { speed: f32 },
    GameOver { score: u64 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,

    pub phase: GamePhase,
    pub score: u64,
    /// Remaining ammunition
    pub bullets: u32,
    /// Countdown seconds remaining
    pub time_left: u32,
    /// Always within [0, MAX_HEALTH]
    pub health: u8,
    /// Current bullet speed (pixels per frame)
    pub bullet_speed: f32,
    /// Speed restored after a power-down; captured at reset
    pub base_bullet_speed: f32,
    /// Whether the fire input is held
    pub firing: bool,

    pub playfield: Playfield,
    pub attacker: Attacker,
    /// Latest pointer position in playfield coordinates
    pub pointer: Vec2,

    pub bullets_fired: Vec<Bullet>,
    /// Live fallers, one collection per kind (indexed by `FallerKind::index`)
    pub fallers: [Vec<Faller>; FallerKind::COUNT],
    pub particles: Vec<Particle>,
    pub background: Vec<BackgroundParticle>,

    pub triggers: Triggers,
    /// Frames simulated since the last reset
    pub frame: u64,
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle game state; nothing runs until [`GameState::start`]
    pub fn new(tuning: Tuning, width: f32, height: f32, seed: u64) -> Self {
        let tuning = tuning.sanitized();
        let playfield = Playfield::new(width, height);
        let mut rng = Pcg32::seed_from_u64(seed);
        let background = (0..BACKGROUND_PARTICLES)
            .map(|_| BackgroundParticle::random(&mut rng, &playfield))
            .collect();

        Self {
            seed,
            rng,
            phase: GamePhase::Idle,
            score: 0,
            bullets: tuning.bullets,
            time_left: tuning.time_limit,
            health: tuning.health.min(MAX_HEALTH),
            bullet_speed: tuning.bullet_speed,
            base_bullet_speed: tuning.bullet_speed,
            firing: false,
            attacker: Attacker {
                pos: playfield.center(),
                radius: tuning.attacker_radius,
                angle: 0.0,
            },
            pointer: playfield.center(),
            playfield,
            bullets_fired: Vec::new(),
            fallers: Default::default(),
            particles: Vec::new(),
            background,
            triggers: Triggers::new(),
            frame: 0,
            events: Vec::new(),
            tuning,
        }
    }

    pub fn spec(&self, kind: FallerKind) -> &FallerSpec {
        self.tuning.spec(kind)
    }

    pub fn fallers(&self, kind: FallerKind) -> &[Faller] {
        &self.fallers[kind.index()]
    }

    pub fn fallers_mut(&mut self, kind: FallerKind) -> &mut Vec<Faller> {
        &mut self.fallers[kind.index()]
    }

    /// Total fallers of every kind
    pub fn faller_count(&self) -> usize {
        self.fallers.iter().map(Vec::len).sum()
    }

    /// Remaining time as a fraction of the full clock
    pub fn time_fraction(&self) -> f32 {
        self.time_left.min(self.tuning.time_limit) as f32 / self.tuning.time_limit as f32
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Add health, clamped to the maximum
    pub fn heal(&mut self, amount: u8) {
        self.health = self.health.saturating_add(amount).min(MAX_HEALTH);
    }

    /// Remove health, floored at zero
    pub fn damage(&mut self, amount: u8) {
        self.health = self.health.saturating_sub(amount).min(MAX_HEALTH);
    }

    /// Resize the playfield; recentres the attacker and reseeds the background
    pub fn resize(&mut self, width: f32, height: f32) {
        self.playfield = Playfield::new(width, height);
        self.attacker.pos = self.playfield.center();
        super::motion::reseed_background(self);
    }

    /// Begin play from the idle phase
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Idle {
            return false;
        }
        self.phase = GamePhase::Running;
        self.start_triggers();
        self.emit(GameEvent::Started);
        log::info!("Game started (seed {})", self.seed);
        true
    }

    /// Toggle between running and paused. Returns whether the phase changed.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            GamePhase::Running => {
                self.phase = GamePhase::Paused;
                self.triggers.cancel(Slot::Countdown);
                self.triggers.cancel(Slot::AutoFire);
                self.firing = false;
                self.emit(GameEvent::Paused);
                log::info!("Paused with {}s left", self.time_left);
                true
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Running;
                self.triggers
                    .start_periodic(Slot::Countdown, self.tuning.timer_period);
                self.emit(GameEvent::Resumed);
                log::info!("Resumed with {}s left", self.time_left);
                true
            }
            GamePhase::Idle | GamePhase::GameOver => false,
        }
    }

    /// Reinitialise every field and collection and start a fresh run
    pub fn reset(&mut self) {
        self.triggers.cancel_all();

        let tuning = self.tuning.clone();
        self.score = 0;
        self.bullets = tuning.bullets;
        self.time_left = tuning.time_limit;
        self.health = tuning.health.min(MAX_HEALTH);
        self.base_bullet_speed = tuning.bullet_speed;
        self.bullet_speed = self.base_bullet_speed;
        self.firing = false;
        self.attacker = Attacker {
            pos: self.playfield.center(),
            radius: tuning.attacker_radius,
            angle: 0.0,
        };
        self.bullets_fired.clear();
        for fallers in &mut self.fallers {
            fallers.clear();
        }
        self.particles.clear();
        self.frame = 0;

        self.phase = GamePhase::Running;
        self.start_triggers();
        self.emit(GameEvent::Reset);
        log::info!("Game reset");
    }

    /// Enter the game-over phase; idempotent
    pub fn end_game(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.firing = false;
        self.triggers.cancel_all();
        self.emit(GameEvent::GameOver { score: self.score });
        log::info!(
            "Game over: score {}, health {}, {}s left",
            self.score,
            self.health,
            self.time_left
        );
    }

    /// End the run if the clock or health ran out
    pub fn check_end(&mut self) {
        if self.phase == GamePhase::Running && (self.time_left == 0 || self.health == 0) {
            self.end_game();
        }
    }

    /// Countdown and spawner triggers for a fresh run
    fn start_triggers(&mut self) {
        self.triggers
            .start_periodic(Slot::Countdown, self.tuning.timer_period);
        for kind in FallerKind::ALL {
            let period = self.tuning.spec(kind).spawn_period;
            self.triggers.start_periodic(Slot::Spawn(kind), period);
        }
    }
}
