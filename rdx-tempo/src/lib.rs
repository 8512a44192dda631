//! # Tempo
//!
//! Non-blocking periodic and one-shot timers addressed by symbolic ids.
//!
//! Tempo replaces hand-rolled `now - last > period` bookkeeping with
//! intention-revealing calls. It is built for polling loops on small
//! targets: a bounded table of timers, no allocation after construction,
//! and arithmetic that survives the millisecond counter wrapping.
//!
//! ## Core Concepts
//!
//! - **Clock**: the single source of time, a wrapping `u32` millisecond
//!   count supplied by the application through the [`clock::Clock`] trait.
//! - **TimerId**: an opaque key, usually `TimerId::named("NAME")`, hashed
//!   at compile time.
//! - **Registry**: a [`TempoRegistry`](registry::TempoRegistry) owns a
//!   fixed number of slots. An id gets a slot the first time it is used and
//!   keeps it, bound to one kind, for the life of the registry.
//! - **Periodic / OneShot**: handles over a slot. A periodic timer fires
//!   once per period without drift; a one-shot counts down once.
//! - **Latched errors**: nothing panics or returns `Err` on the timer path.
//!   Failed operations return a safe default and record the most recent
//!   error for the application to poll.
//!
//! ## Example Usage
//!
//! ```rust
//! use tempo::prelude::*;
//!
//! const HEARTBEAT: TimerId = TimerId::named("HEARTBEAT");
//! const WATCHDOG: TimerId = TimerId::named("WATCHDOG");
//!
//! let clock = ManualClock::new();
//! let mut tempo = TempoRegistry::new(clock.clone());
//!
//! tempo.one_shot(WATCHDOG).start_hms("00:00:05");
//! assert!(!tempo.periodic(HEARTBEAT).tick(1_000));
//!
//! clock.advance(1_000);
//! assert!(tempo.periodic(HEARTBEAT).tick(1_000));
//! assert_eq!(render_remaining(&tempo, WATCHDOG, Format::AutoShort).to_string(), "4 sec");
//!
//! clock.advance(4_000);
//! assert!(tempo.one_shot(WATCHDOG).is_done());
//! assert_eq!(tempo.last_error(), None);
//! ```

pub const ENGINE_NAME: &str = "Tempo";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Declare all the modules in the crate.
pub mod clock;
pub mod common;
pub mod components;
pub mod config;
pub mod error;
pub mod format;
pub mod registry;

/// A prelude module for easy importing of the most common Tempo types.
pub mod prelude {
    pub use crate::clock::{Clock, ManualClock, MonotonicClock};
    pub use crate::common::{TimerId, TimerKind};
    pub use crate::components::{OneShot, Periodic, SlotView};
    pub use crate::config::TempoConfig;
    pub use crate::error::TempoError;
    pub use crate::format::{parse_strict, render, render_elapsed, render_remaining, Format};
    pub use crate::registry::{OneShotReadout, TempoRegistry};
}
