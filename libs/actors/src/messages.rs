//! Message Types
//!
//! The message contract shared by every actor in the runtime. A message is an
//! immutable value: a kind tag selecting the handler, a tagged payload, and an
//! optional reply target. Messages are created by a sender at enqueue time,
//! owned by the destination mailbox until dequeued, and consumed by the
//! receiving actor's dispatch.

use std::fmt;

use crate::actor::ActorRef;

/// The fixed kind vocabulary understood by the stock behaviors.
///
/// Kinds are plain strings so that an extended actor can register handlers
/// for kinds this module has never heard of; unknown kinds are reported at
/// dispatch time, not rejected at construction time.
pub mod kind {
    /// Overwrite the actor's stored state from the payload.
    pub const STORE: &str = "store";
    /// Combine the payload into the stored state via the actor's strategy.
    pub const OP: &str = "op";
    /// Invoke the actor's outbound propagation policy.
    pub const SEND: &str = "send";
    /// Terminal reply. Rendered by the receiving actor, never dispatched.
    pub const RESULT: &str = "result";
}

/// Process-unique actor name.
///
/// Names are the only addressing scheme in the runtime: the registry maps
/// names to live actors, and `Message::reply_to` carries a name rather than
/// a direct reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(String);

impl ActorId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for ActorId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Tagged message payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Text(String),
    /// Reference to another actor, delivered by handle.
    Actor(ActorRef),
}

impl Value {
    /// Variant name used in mismatch reports.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "Int",
            Value::Text(_) => "Text",
            Value::Actor(_) => "Actor",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Actor(actor) => write!(f, "<actor {}>", actor.id()),
        }
    }
}

/// Immutable unit of communication between actors.
///
/// `reply_to` of `None` means "no propagation": the chain ends with whoever
/// consumes this message.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub kind: String,
    pub payload: Value,
    pub reply_to: Option<ActorId>,
}

impl Message {
    pub fn new(kind: impl Into<String>, payload: Value, reply_to: Option<ActorId>) -> Self {
        Self {
            kind: kind.into(),
            payload,
            reply_to,
        }
    }

    /// `store` message: overwrite the receiver's state.
    pub fn store(payload: Value, reply_to: Option<ActorId>) -> Self {
        Self::new(kind::STORE, payload, reply_to)
    }

    /// `op` message: fold the payload into the receiver's state.
    pub fn op(payload: Value, reply_to: Option<ActorId>) -> Self {
        Self::new(kind::OP, payload, reply_to)
    }

    /// `send` message: ask the receiver to run its propagation policy.
    pub fn send(payload: Value, reply_to: Option<ActorId>) -> Self {
        Self::new(kind::SEND, payload, reply_to)
    }

    /// `result` message: terminal reply, never propagated further.
    pub fn result(payload: Value) -> Self {
        Self::new(kind::RESULT, payload, None)
    }
}
