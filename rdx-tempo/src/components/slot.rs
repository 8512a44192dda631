//! Defines the timer slot: the per-id state the registry stores in its arena.

use crate::clock::elapsed_since;
use crate::common::{TimerId, TimerKind};

/// One logical timer.
///
/// `anchor` is the clock reading the current period or countdown started
/// from. Every span is measured with wrapping subtraction from it.
#[doc(hidden)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimerSlot {
    pub id: TimerId,
    pub kind: TimerKind,
    pub anchor: u32,
    pub duration: u32,
    pub active: bool,
}

impl TimerSlot {
    /// Creates an idle slot bound to `id` and `kind`.
    pub(crate) fn new(id: TimerId, kind: TimerKind) -> Self {
        Self {
            id,
            kind,
            anchor: 0,
            duration: 0,
            active: false,
        }
    }

    /// Starts (or restarts) a countdown of `duration` from `now`.
    pub(crate) fn arm(&mut self, now: u32, duration: u32) {
        self.anchor = now;
        self.duration = duration;
        self.active = true;
    }

    /// Advances a periodic slot. Returns `true` if a period boundary was crossed.
    ///
    /// The first call only arms the slot. Later calls move the anchor forward
    /// by exactly one period per firing, so lateness never accumulates as
    /// drift, and at most one firing is reported per call.
    pub(crate) fn tick(&mut self, now: u32, period: u32) -> bool {
        if !self.active {
            self.arm(now, period);
            return false;
        }

        if elapsed_since(now, self.anchor) >= self.duration {
            self.anchor = self.anchor.wrapping_add(self.duration);
            return true;
        }

        false
    }

    pub(crate) fn elapsed(&self, now: u32) -> u32 {
        if self.active {
            elapsed_since(now, self.anchor)
        } else {
            0
        }
    }

    pub(crate) fn remaining(&self, now: u32) -> u32 {
        if self.active {
            self.duration.saturating_sub(elapsed_since(now, self.anchor))
        } else {
            0
        }
    }

    pub(crate) fn is_running(&self, now: u32) -> bool {
        self.active && elapsed_since(now, self.anchor) < self.duration
    }

    pub(crate) fn is_done(&self, now: u32) -> bool {
        self.active && elapsed_since(now, self.anchor) >= self.duration
    }

    pub(crate) fn view(&self) -> SlotView {
        SlotView {
            id: self.id,
            kind: self.kind,
            anchor: self.anchor,
            duration: self.duration,
            active: self.active,
        }
    }
}

/// A read-only snapshot of an allocated slot, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotView {
    pub id: TimerId,
    pub kind: TimerKind,
    /// Clock reading the current period or countdown started from.
    pub anchor: u32,
    /// Configured period or countdown length, in milliseconds.
    pub duration: u32,
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn periodic() -> TimerSlot {
        TimerSlot::new(TimerId::named("tick"), TimerKind::Periodic)
    }

    #[test]
    fn first_tick_only_arms() {
        let mut slot = periodic();
        assert!(!slot.tick(100, 0));
        assert!(slot.active);
        assert_eq!((slot.anchor, slot.duration), (100, 0));
    }

    #[test]
    fn tick_realigns_to_boundary_instead_of_now() {
        let mut slot = periodic();
        slot.tick(0, 1_000);
        assert!(!slot.tick(999, 1_000));
        assert!(slot.tick(1_250, 1_000));
        assert_eq!(slot.anchor, 1_000);
        assert!(!slot.tick(1_999, 1_000));
        assert!(slot.tick(2_000, 1_000));
        assert_eq!(slot.anchor, 2_000);
    }

    #[test]
    fn period_argument_is_ignored_once_armed() {
        let mut slot = periodic();
        slot.tick(0, 1_000);
        assert!(!slot.tick(500, 10));
        assert_eq!(slot.duration, 1_000);
    }

    #[test]
    fn tick_fires_across_counter_wrap() {
        let mut slot = periodic();
        let start = u32::MAX - 400;
        slot.tick(start, 1_000);
        assert!(!slot.tick(start.wrapping_add(999), 1_000));
        assert!(slot.tick(start.wrapping_add(1_000), 1_000));
        assert_eq!(slot.anchor, 599);
    }

    #[test]
    fn countdown_queries_clamp_and_report() {
        let mut slot = TimerSlot::new(TimerId::named("shot"), TimerKind::OneShot);
        assert_eq!((slot.elapsed(50), slot.remaining(50)), (0, 0));
        assert!(!slot.is_running(50) && !slot.is_done(50));

        slot.arm(10, 100);
        assert!(slot.is_running(60));
        assert_eq!((slot.elapsed(60), slot.remaining(60)), (50, 50));

        assert!(slot.is_done(110));
        assert!(!slot.is_running(110));
        assert_eq!((slot.elapsed(500), slot.remaining(500)), (490, 0));
    }
}
