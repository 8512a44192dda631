//! Contains common, primitive types shared by the registry and the codec.
//!
//! Timers are addressed by a [`TimerId`], an opaque 32-bit key normally derived
//! from a human-readable name. Inside the registry every id is bound to exactly
//! one slot, and that slot is bound to exactly one [`TimerKind`].

use serde::Deserialize;
use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    /// Indexes a slot inside the registry's fixed-size arena.
    ///
    /// Keys are handed out once per identifier and never reused, since slots
    /// are never released.
    pub struct SlotKey;
}

const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a over raw bytes.
pub const fn fnv1a(bytes: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    hash
}

/// Uniquely identifies a timer within a registry.
///
/// Ids are opaque. Collisions between two names are possible in theory but
/// vanishingly unlikely for short, distinct names, and are not detected.
///
/// # Example
/// ```
/// use tempo::common::TimerId;
///
/// const HEARTBEAT: TimerId = TimerId::named("HEARTBEAT");
/// assert_eq!(HEARTBEAT, TimerId::named("HEARTBEAT"));
/// assert_ne!(HEARTBEAT, TimerId::named("WATCHDOG"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct TimerId(pub u32);

impl TimerId {
    /// Hashes `name` into an id. Evaluated at compile time in `const` items.
    pub const fn named(name: &str) -> Self {
        Self(fnv1a(name.as_bytes()))
    }

    /// Wraps a key computed elsewhere.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<&str> for TimerId {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}

/// The behavior a slot is bound to.
///
/// A slot's kind is fixed the moment it is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimerKind {
    #[default]
    Unused,
    /// Auto-rearming, drift-resistant interval.
    Periodic,
    /// Single countdown: delays, watchdogs, timeouts.
    OneShot,
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimerKind::Unused => "unused",
            TimerKind::Periodic => "periodic",
            TimerKind::OneShot => "one-shot",
        };
        f.write_str(label)
    }
}
