//! Defines the periodic timer handle.

use crate::clock::Clock;
use crate::common::{TimerId, TimerKind};
use crate::error::TempoError;
use crate::format::parse_strict;
use crate::registry::TempoRegistry;
use tracing::{debug, trace};

/// An auto-rearming, drift-resistant interval bound to a `TimerId`.
///
/// The handle carries no state of its own. Obtain it from
/// [`TempoRegistry::periodic`] whenever the timer is polled.
pub struct Periodic<'a, C: Clock> {
    registry: &'a mut TempoRegistry<C>,
    id: TimerId,
}

impl<'a, C: Clock> Periodic<'a, C> {
    pub(crate) fn new(registry: &'a mut TempoRegistry<C>, id: TimerId) -> Self {
        Self { registry, id }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Returns `true` once each time `period_ms` has elapsed.
    ///
    /// The first call for an id arms the timer and returns `false`; a full
    /// period must pass before the first firing. `period_ms` is only read on
    /// that first call. If the caller polls late, the next boundary stays
    /// aligned to the original schedule, and a call reports at most one
    /// firing even when several periods have passed.
    ///
    /// Returns `false` without side effects if the id cannot be resolved.
    pub fn tick(&mut self, period_ms: u32) -> bool {
        let now = self.registry.now();
        let id = self.id;
        let Some(slot) = self.registry.resolve(id, TimerKind::Periodic) else {
            return false;
        };
        let fired = slot.tick(now, period_ms);
        if fired {
            trace!("Periodic timer {} fired, next boundary at {}.", id, slot.anchor);
        }
        fired
    }

    /// Same as [`tick`](Self::tick), with the period given as strict `HH:MM:SS`.
    ///
    /// A malformed period latches [`TempoError::InvalidFormat`] and returns
    /// `false` without arming anything.
    pub fn tick_hms(&mut self, period: &str) -> bool {
        match parse_strict(period) {
            Ok(period_ms) => self.tick(period_ms),
            Err(reason) => {
                debug!("Rejected period {:?} for timer {}: {}", period, self.id, reason);
                self.registry.latch(TempoError::InvalidFormat);
                false
            }
        }
    }
}
