//! Contains the building blocks the registry hands out and stores.
//!
//! Slots hold per-timer state inside the registry's arena. [`Periodic`] and
//! [`OneShot`] are lightweight handles bound to a `TimerId`; every operation
//! on them goes through the registry that created them.

pub mod one_shot;
pub mod periodic;
pub(crate) mod slot;

pub use one_shot::OneShot;
pub use periodic::Periodic;
pub use slot::SlotView;
