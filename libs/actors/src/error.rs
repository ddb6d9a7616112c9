//! Runtime Error Types
//!
//! Every failure in the runtime is local to a single unit of work: the loop
//! reports it and moves on to the next message. Nothing here is fatal to the
//! process. A registry lookup miss is deliberately NOT an error; callers use
//! `Option` as the control-flow signal selecting the spawn-down branch.

use thiserror::Error;

use crate::messages::ActorId;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ActorError>;

/// Recoverable runtime errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActorError {
    /// Dispatch found no handler for the message kind.
    #[error("no handler registered for message kind `{kind}`")]
    UnknownKind { kind: String },

    /// Registry insertion with an already-used name. The original
    /// registration is preserved.
    #[error("actor `{name}` is already registered")]
    NameConflict { name: ActorId },

    /// A handler received a payload of the wrong variant. State is left
    /// untouched.
    #[error("payload mismatch: expected {expected} payload, found {found}")]
    PayloadMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// The configured actor ceiling would be exceeded by a spawn.
    #[error("actor limit reached ({limit}); spawn request dropped")]
    SpawnLimit { limit: usize },
}
