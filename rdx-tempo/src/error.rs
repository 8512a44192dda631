//! Error codes latched by the registry.
//!
//! Nothing in Tempo returns these through `Result` on the hot path. Each
//! failing operation degrades to a safe default and records its code as the
//! registry's last error, which the application may poll whenever it likes.

use crate::common::{TimerId, TimerKind};

/// The taxonomy of latched errors. "No error" is `None` in `Option<TempoError>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TempoError {
    /// The slot table is at capacity and a new id could not be registered.
    #[error("slot table full: no room to register timer {id}")]
    SlotTableFull { id: TimerId },

    /// A textual duration failed strict `HH:MM:SS` parsing.
    #[error("invalid duration format, expected strict HH:MM:SS")]
    InvalidFormat,

    /// An id was reused with a kind other than the one its slot is bound to.
    ///
    /// This is a programming error in the caller. The offending call is
    /// rejected and the slot is left untouched.
    #[error("timer {id} is {bound}, not {requested}")]
    IdKindMismatch {
        id: TimerId,
        bound: TimerKind,
        requested: TimerKind,
    },
}

impl TempoError {
    /// Variant name without payload, handy for logs and shell output.
    pub fn code(&self) -> &'static str {
        match self {
            TempoError::SlotTableFull { .. } => "SlotTableFull",
            TempoError::InvalidFormat => "InvalidFormat",
            TempoError::IdKindMismatch { .. } => "IdKindMismatch",
        }
    }
}
