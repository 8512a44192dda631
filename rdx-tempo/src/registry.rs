//! The registry that owns every timer slot and the latched error state.

use crate::clock::Clock;
use crate::common::{SlotKey, TimerId, TimerKind};
use crate::components::slot::{SlotView, TimerSlot};
use crate::components::{OneShot, Periodic};
use crate::config::{TempoConfig, DEFAULT_CAPACITY};
use crate::error::TempoError;
use slotmap::SlotMap;
use std::cell::Cell;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Read access to one-shot timers, as needed by the duration codec.
pub trait OneShotReadout {
    /// Remaining milliseconds of one-shot `id`, or 0 if unknown or inactive.
    fn remaining_ms(&self, id: TimerId) -> u32;
    /// Elapsed milliseconds of one-shot `id`, or 0 if unknown or inactive.
    fn elapsed_ms(&self, id: TimerId) -> u32;
}

/// Owns a fixed-capacity table of timer slots.
///
/// The registry is the explicit context every timer operation runs through.
/// Slots are allocated lazily the first time an id is started or ticked and
/// live for as long as the registry does. Storage for `capacity` slots is
/// reserved at construction, so no operation allocates afterwards.
///
/// Operations never fail loudly. When something goes wrong they return a
/// safe default (`false`, `0`, or nothing) and latch a [`TempoError`] that
/// [`last_error`](Self::last_error) reports until the next error replaces it.
///
/// The registry is single-threaded by construction (`!Sync`): it is meant to
/// be owned by one polling loop.
pub struct TempoRegistry<C: Clock> {
    clock: C,
    capacity: usize,
    slots: SlotMap<SlotKey, TimerSlot>,
    index: HashMap<TimerId, SlotKey>,
    last_error: Cell<Option<TempoError>>,
}

// Construction and inspection.
impl<C: Clock> TempoRegistry<C> {
    /// Creates a registry with room for [`DEFAULT_CAPACITY`] timers.
    pub fn new(clock: C) -> Self {
        Self::with_capacity(clock, DEFAULT_CAPACITY)
    }

    /// Creates a registry with room for exactly `capacity` timers.
    pub fn with_capacity(clock: C, capacity: usize) -> Self {
        Self {
            clock,
            capacity,
            slots: SlotMap::with_capacity_and_key(capacity),
            index: HashMap::with_capacity(capacity),
            last_error: Cell::new(None),
        }
    }

    pub fn from_config(clock: C, config: &TempoConfig) -> Self {
        Self::with_capacity(clock, config.capacity)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of allocated slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    /// The most recent error, if any. Reading it does not clear it.
    pub fn last_error(&self) -> Option<TempoError> {
        self.last_error.get()
    }

    /// Snapshots of every allocated slot, in allocation order.
    pub fn slots(&self) -> impl Iterator<Item = SlotView> + '_ {
        self.slots.values().map(TimerSlot::view)
    }

    /// Snapshot of the slot bound to `id`, whatever its kind.
    pub fn slot(&self, id: TimerId) -> Option<SlotView> {
        let key = self.index.get(&id)?;
        self.slots.get(*key).map(TimerSlot::view)
    }
}

// Handles.
impl<C: Clock> TempoRegistry<C> {
    /// Returns the periodic timer handle for `id`.
    ///
    /// ```
    /// use tempo::prelude::*;
    ///
    /// let clock = ManualClock::new();
    /// let mut tempo = TempoRegistry::new(clock.clone());
    /// const HEARTBEAT: TimerId = TimerId::named("HEARTBEAT");
    ///
    /// assert!(!tempo.periodic(HEARTBEAT).tick(1_000)); // arms
    /// clock.advance(1_000);
    /// assert!(tempo.periodic(HEARTBEAT).tick(1_000));
    /// ```
    pub fn periodic(&mut self, id: TimerId) -> Periodic<'_, C> {
        Periodic::new(self, id)
    }

    /// Returns the one-shot timer handle for `id`.
    pub fn one_shot(&mut self, id: TimerId) -> OneShot<'_, C> {
        OneShot::new(self, id)
    }
}

// Slot resolution, used by the handles.
impl<C: Clock> TempoRegistry<C> {
    pub(crate) fn now(&self) -> u32 {
        self.clock.now_ms()
    }

    pub(crate) fn latch(&self, error: TempoError) {
        warn!("Latched {}: {}", error.code(), error);
        self.last_error.set(Some(error));
    }

    /// Finds the slot for `id`, allocating one bound to `kind` if absent.
    ///
    /// Returns `None` (after latching) if the table is full or `id` is
    /// already bound to a different kind.
    pub(crate) fn resolve(&mut self, id: TimerId, kind: TimerKind) -> Option<&mut TimerSlot> {
        if let Some(&key) = self.index.get(&id) {
            return self.checked_mut(key, kind);
        }

        if self.is_full() {
            self.latch(TempoError::SlotTableFull { id });
            return None;
        }

        let key = self.slots.insert(TimerSlot::new(id, kind));
        self.index.insert(id, key);
        debug!(
            "Allocated {} slot for timer {} ({}/{}).",
            kind,
            id,
            self.slots.len(),
            self.capacity
        );
        self.slots.get_mut(key)
    }

    /// Finds an existing slot for `id` without allocating.
    pub(crate) fn lookup(&self, id: TimerId, kind: TimerKind) -> Option<&TimerSlot> {
        let key = *self.index.get(&id)?;
        let slot = self.slots.get(key)?;
        if slot.kind != kind {
            self.latch(TempoError::IdKindMismatch {
                id,
                bound: slot.kind,
                requested: kind,
            });
            return None;
        }
        Some(slot)
    }

    /// Mutable form of [`lookup`](Self::lookup).
    pub(crate) fn lookup_mut(&mut self, id: TimerId, kind: TimerKind) -> Option<&mut TimerSlot> {
        let key = *self.index.get(&id)?;
        self.checked_mut(key, kind)
    }

    fn checked_mut(&mut self, key: SlotKey, kind: TimerKind) -> Option<&mut TimerSlot> {
        let (id, bound) = {
            let slot = self.slots.get(key)?;
            (slot.id, slot.kind)
        };
        if bound != kind {
            self.latch(TempoError::IdKindMismatch {
                id,
                bound,
                requested: kind,
            });
            return None;
        }
        self.slots.get_mut(key)
    }
}

impl<C: Clock> OneShotReadout for TempoRegistry<C> {
    fn remaining_ms(&self, id: TimerId) -> u32 {
        let now = self.now();
        self.lookup(id, TimerKind::OneShot)
            .map_or(0, |slot| slot.remaining(now))
    }

    fn elapsed_ms(&self, id: TimerId) -> u32 {
        let now = self.now();
        self.lookup(id, TimerKind::OneShot)
            .map_or(0, |slot| slot.elapsed(now))
    }
}
