//! Periodic and one-shot triggers
//!
//! Every timed callback the game needs (countdown, spawners, auto-fire,
//! bullet-speed restore) is a slot in [`Triggers`]. A slot holds at most one
//! live trigger: starting a trigger replaces whatever the slot held.
//! Triggers only advance when the loop driver feeds them elapsed time.

use super::kinds::FallerKind;

/// Named trigger slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// One-second countdown
    Countdown,
    /// Spawner for one faller kind
    Spawn(FallerKind),
    /// Repeated fire while the fire input is held
    AutoFire,
    /// Deferred restore of the bullet speed after a power-down
    SpeedRestore,
}

/// Identity of a started trigger, unique for the lifetime of a `Triggers`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriggerId(u64);

#[derive(Debug, Clone)]
struct Trigger {
    id: TriggerId,
    slot: Slot,
    period: f32,
    elapsed: f32,
    repeat: bool,
}

/// A trigger that came due during [`Triggers::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub slot: Slot,
    pub id: TriggerId,
}

/// The set of live triggers
#[derive(Debug, Clone, Default)]
pub struct Triggers {
    active: Vec<Trigger>,
    next_id: u64,
}

impl Triggers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a repeating trigger, cancelling any trigger in the same slot
    pub fn start_periodic(&mut self, slot: Slot, period: f32) -> TriggerId {
        self.start(slot, period, true)
    }

    /// Start a one-shot trigger, cancelling any trigger in the same slot
    pub fn start_once(&mut self, slot: Slot, delay: f32) -> TriggerId {
        self.start(slot, delay, false)
    }

    fn start(&mut self, slot: Slot, period: f32, repeat: bool) -> TriggerId {
        self.cancel(slot);
        self.next_id += 1;
        let id = TriggerId(self.next_id);
        self.active.push(Trigger {
            id,
            slot,
            // A zero period would fire forever inside one advance
            period: period.max(f32::EPSILON),
            elapsed: 0.0,
            repeat,
        });
        id
    }

    /// Cancel the trigger in `slot`; returns whether one was live
    pub fn cancel(&mut self, slot: Slot) -> bool {
        let before = self.active.len();
        self.active.retain(|t| t.slot != slot);
        self.active.len() != before
    }

    /// Cancel every live trigger
    pub fn cancel_all(&mut self) {
        self.active.clear();
    }

    pub fn is_active(&self, slot: Slot) -> bool {
        self.active.iter().any(|t| t.slot == slot)
    }

    /// Whether `id` is still the live trigger of `slot`
    pub fn is_current(&self, fired: Fired) -> bool {
        self.active
            .iter()
            .any(|t| t.slot == fired.slot && t.id == fired.id)
    }

    /// Id of the live trigger in `slot`
    pub fn id_of(&self, slot: Slot) -> Option<TriggerId> {
        self.active.iter().find(|t| t.slot == slot).map(|t| t.id)
    }

    /// Number of live triggers in `slot` (never more than one)
    pub fn count(&self, slot: Slot) -> usize {
        self.active.iter().filter(|t| t.slot == slot).count()
    }

    /// Total number of live triggers
    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Seconds until the trigger in `slot` next fires
    pub fn remaining(&self, slot: Slot) -> Option<f32> {
        self.active
            .iter()
            .find(|t| t.slot == slot)
            .map(|t| (t.period - t.elapsed).max(0.0))
    }

    /// Advance every trigger by `dt` seconds and return what came due,
    /// in start order. Repeating triggers may fire several times for a large
    /// `dt`; one-shot triggers are removed once they fire.
    pub fn advance(&mut self, dt: f32) -> Vec<Fired> {
        let mut fired = Vec::new();
        if dt <= 0.0 {
            return fired;
        }

        for trigger in &mut self.active {
            trigger.elapsed += dt;
            while trigger.elapsed >= trigger.period {
                trigger.elapsed -= trigger.period;
                fired.push(Fired {
                    slot: trigger.slot,
                    id: trigger.id,
                });
                if !trigger.repeat {
                    break;
                }
            }
        }

        self.active
            .retain(|t| t.repeat || !fired.iter().any(|f| f.id == t.id));
        fired
    }
}
