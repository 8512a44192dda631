//! Defines the one-shot timer handle.

use crate::clock::Clock;
use crate::common::{TimerId, TimerKind};
use crate::error::TempoError;
use crate::format::{parse_strict, render_elapsed, render_remaining, Format, Rendered};
use crate::registry::{OneShotReadout, TempoRegistry};
use tracing::{debug, trace};

/// A single countdown bound to a `TimerId`: delays, watchdogs, timeouts.
///
/// Only [`start`](Self::start) allocates a slot. Every other operation on an
/// id the registry has never seen is a no-op that reports an idle timer.
pub struct OneShot<'a, C: Clock> {
    registry: &'a mut TempoRegistry<C>,
    id: TimerId,
}

impl<'a, C: Clock> OneShot<'a, C> {
    pub(crate) fn new(registry: &'a mut TempoRegistry<C>, id: TimerId) -> Self {
        Self { registry, id }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Starts the countdown from now, replacing any countdown in progress.
    pub fn start(&mut self, duration_ms: u32) {
        let now = self.registry.now();
        let id = self.id;
        if let Some(slot) = self.registry.resolve(id, TimerKind::OneShot) {
            slot.arm(now, duration_ms);
            trace!("One-shot timer {} started for {} ms.", id, duration_ms);
        }
    }

    /// Same as [`start`](Self::start), with the duration given as strict `HH:MM:SS`.
    ///
    /// A malformed duration latches [`TempoError::InvalidFormat`] and leaves
    /// the timer untouched.
    pub fn start_hms(&mut self, duration: &str) {
        match parse_strict(duration) {
            Ok(duration_ms) => self.start(duration_ms),
            Err(reason) => {
                debug!("Rejected duration {:?} for timer {}: {}", duration, self.id, reason);
                self.registry.latch(TempoError::InvalidFormat);
            }
        }
    }

    /// Restarts an active countdown from now with its configured duration.
    pub fn restart(&mut self) {
        let now = self.registry.now();
        if let Some(slot) = self.registry.lookup_mut(self.id, TimerKind::OneShot) {
            if slot.active {
                slot.anchor = now;
            }
        }
    }

    /// Deactivates the timer. Its slot stays reserved for this id.
    pub fn cancel(&mut self) {
        if let Some(slot) = self.registry.lookup_mut(self.id, TimerKind::OneShot) {
            slot.active = false;
            trace!("One-shot timer {} cancelled.", slot.id);
        }
    }

    /// `true` while an active countdown has not yet expired.
    pub fn is_running(&self) -> bool {
        let now = self.registry.now();
        self.registry
            .lookup(self.id, TimerKind::OneShot)
            .is_some_and(|slot| slot.is_running(now))
    }

    /// `true` once an active countdown has expired.
    ///
    /// A timer that was never started, or was cancelled, is neither running
    /// nor done.
    pub fn is_done(&self) -> bool {
        let now = self.registry.now();
        self.registry
            .lookup(self.id, TimerKind::OneShot)
            .is_some_and(|slot| slot.is_done(now))
    }

    /// Milliseconds since the countdown started, or 0 if inactive.
    pub fn elapsed(&self) -> u32 {
        self.registry.elapsed_ms(self.id)
    }

    /// Milliseconds until expiry, clamped at 0, or 0 if inactive.
    pub fn remaining(&self) -> u32 {
        self.registry.remaining_ms(self.id)
    }

    pub fn remaining_text(&self, style: Format) -> Rendered {
        render_remaining(&*self.registry, self.id, style)
    }

    pub fn elapsed_text(&self, style: Format) -> Rendered {
        render_elapsed(&*self.registry, self.id, style)
    }
}
