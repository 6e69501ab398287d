// Fixed-capacity arena of key motion slots. Keys get a stable handle at
// mount time and release it at unmount; generation counters make stale
// handles harmless after a layout swap. Slots are independent, so the
// per-frame batch step runs them in parallel.

use rayon::prelude::*;
use smallvec::SmallVec;

use crate::config;
use crate::motion::key_state::{KeyMotionSample, KeyMotionState, MotionInput};
use crate::presets;

/// Stable reference to one mounted key. Cheap to copy and safe to hold
/// across layout changes; operations through an outdated handle do nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyHandle {
    index: u32,
    generation: u32,
}

struct MotionSlot {
    generation: u32,
    occupied: bool,
    key_id: String,
    state: KeyMotionState,
    /// Press/release events queued since the last step, oldest first.
    pending: SmallVec<[bool; 4]>,
    last_sample: KeyMotionSample,
}

impl MotionSlot {
    fn vacant() -> Self {
        Self {
            generation: 0,
            occupied: false,
            key_id: String::new(),
            state: KeyMotionState::new(""),
            pending: SmallVec::new(),
            last_sample: KeyMotionSample::default(),
        }
    }
}

pub struct MotionArena {
    slots: Vec<MotionSlot>,
    free: Vec<u32>,
    live: usize,
}

impl MotionArena {
    pub fn new() -> Self {
        Self::with_capacity(config::ARENA_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| MotionSlot::vacant()).collect(),
            free: (0..capacity as u32).rev().collect(),
            live: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn slot(&self, handle: KeyHandle) -> Option<&MotionSlot> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.occupied && slot.generation == handle.generation)
    }

    fn slot_mut(&mut self, handle: KeyHandle) -> Option<&mut MotionSlot> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.occupied && slot.generation == handle.generation)
    }

    /// Handle of an already mounted key, by identity.
    pub fn handle_of(&self, key_id: &str) -> Option<KeyHandle> {
        self.slots
            .iter()
            .enumerate()
            .find(|(_, slot)| slot.occupied && slot.key_id == key_id)
            .map(|(index, slot)| KeyHandle {
                index: index as u32,
                generation: slot.generation,
            })
    }

    /// Mounts a key and returns its handle. Mounting an id that is already
    /// live returns the existing handle. Returns `None` when every slot is
    /// taken; the key simply stays unanimated.
    pub fn mount(&mut self, key_id: &str) -> Option<KeyHandle> {
        if let Some(existing) = self.handle_of(key_id) {
            return Some(existing);
        }

        let Some(index) = self.free.pop() else {
            tracing::warn!(key = key_id, capacity = self.slots.len(), "motion arena full");
            return None;
        };

        let slot = &mut self.slots[index as usize];
        slot.occupied = true;
        slot.key_id.clear();
        slot.key_id.push_str(key_id);
        slot.state = KeyMotionState::new(key_id);
        slot.pending.clear();
        slot.last_sample = KeyMotionSample::default();
        self.live += 1;

        Some(KeyHandle {
            index,
            generation: slot.generation,
        })
    }

    /// Discards a key's motion state and frees its slot. Queued events die
    /// with the slot so nothing can act on the stale identity later.
    pub fn unmount(&mut self, handle: KeyHandle) {
        let index = handle.index as usize;
        let Some(slot) = self
            .slots
            .get_mut(index)
            .filter(|slot| slot.occupied && slot.generation == handle.generation)
        else {
            return;
        };

        slot.occupied = false;
        slot.generation = slot.generation.wrapping_add(1);
        slot.pending.clear();
        self.free.push(handle.index);
        self.live -= 1;
    }

    /// Queues a press event; applied at the start of the next step.
    pub fn press(&mut self, handle: KeyHandle) {
        if let Some(slot) = self.slot_mut(handle) {
            slot.pending.push(true);
        }
    }

    /// Queues a release event. Per-key ordering follows queue order, so a
    /// release never overtakes the press it answers.
    pub fn release(&mut self, handle: KeyHandle) {
        if let Some(slot) = self.slot_mut(handle) {
            slot.pending.push(false);
        }
    }

    /// Last computed pose for a key, without advancing it.
    pub fn sample(&self, handle: KeyHandle) -> Option<KeyMotionSample> {
        self.slot(handle).map(|slot| slot.last_sample)
    }

    pub fn key_id(&self, handle: KeyHandle) -> Option<&str> {
        self.slot(handle).map(|slot| slot.key_id.as_str())
    }

    /// Iterates live keys with their latest samples.
    pub fn samples(&self) -> impl Iterator<Item = (&str, KeyMotionSample)> {
        self.slots
            .iter()
            .filter(|slot| slot.occupied)
            .map(|slot| (slot.key_id.as_str(), slot.last_sample))
    }

    /// Advances every live key by one tick. `resolve` maps a key identity
    /// to its derived parameter view; keys it cannot resolve (derivation
    /// cache mid-rebuild) keep their previous sample. Slots never touch
    /// each other's state, so the batch runs in parallel.
    pub fn step_frame<'a, F>(&mut self, dt: f32, resolve: F)
    where
        F: Sync + Fn(&str) -> Option<MotionInput<'a>>,
    {
        let tuning = presets::motion_tuning();

        self.slots.par_iter_mut().for_each(|slot| {
            if !slot.occupied {
                return;
            }

            for pressed in slot.pending.drain(..) {
                slot.state.set_pressed(pressed);
            }

            if let Some(input) = resolve(&slot.key_id) {
                slot.last_sample = slot.state.update_with(&tuning, dt, &input);
            }
        });
    }
}

impl Default for MotionArena {
    fn default() -> Self {
        Self::new()
    }
}
