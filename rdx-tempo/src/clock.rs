//! Millisecond time sources consumed by the registry.
//!
//! The registry never reads time on its own; it asks a [`Clock`] for the
//! current count. Counts are `u32` and wrap, so every consumer must measure
//! spans with [`elapsed_since`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// A monotonic, wrapping millisecond counter.
pub trait Clock {
    /// Current count in milliseconds. Wraps to zero after `u32::MAX`.
    fn now_ms(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// Milliseconds from `anchor` to `now`, correct across one counter wrap.
#[inline]
pub const fn elapsed_since(now: u32, anchor: u32) -> u32 {
    now.wrapping_sub(anchor)
}

/// Milliseconds since this clock was created, truncated to a wrapping `u32`.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u32 {
        // Truncation is the wrap.
        self.origin.elapsed().as_millis() as u32
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same counter, so a test or shell can keep one handle
/// while the registry owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u32>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Starts the counter at `ms`, e.g. just below `u32::MAX` to exercise wrap.
    pub fn starting_at(ms: u32) -> Self {
        Self {
            now: Rc::new(Cell::new(ms)),
        }
    }

    /// Moves time forward by `ms`, wrapping like a hardware counter.
    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }

    pub fn set(&self, ms: u32) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}
