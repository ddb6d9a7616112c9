//! Actor Behavior Variants
//!
//! State plus per-kind operations for the stock actors. Instead of an
//! inheritance hierarchy there is a closed tagged union: each variant carries
//! its own state and a strategy function invoked by the `op` handler. New
//! strategies plug in as plain function pointers.
//!
//! The seed transforms below feed the spawn-down path: when an actor spawns
//! a child, the child is seeded with a value derived from the parent's
//! current state.

use rand::seq::SliceRandom;

use crate::error::{ActorError, Result};
use crate::messages::Value;

/// Strategy applied by a numeric actor's `op` handler.
/// Arguments are (stored, payload).
pub type NumericOp = fn(i64, i64) -> i64;

/// Strategy applied by a text actor's `op` handler.
/// Arguments are (stored, payload).
pub type TextOp = fn(&str, &str) -> String;

/// Stock strategy functions.
pub mod ops {
    /// Multiply the stored value by the payload.
    pub fn multiply(stored: i64, payload: i64) -> i64 {
        stored * payload
    }

    /// Add the payload to the stored value.
    pub fn add(stored: i64, payload: i64) -> i64 {
        stored + payload
    }

    /// Square the stored value, ignoring the payload.
    pub fn square(stored: i64, _payload: i64) -> i64 {
        stored * stored
    }

    /// Append the payload to the stored text, space separated.
    pub fn append(stored: &str, payload: &str) -> String {
        if stored.is_empty() {
            payload.to_string()
        } else {
            format!("{} {}", stored, payload)
        }
    }

    /// Replace the stored text with the payload.
    pub fn replace(_stored: &str, payload: &str) -> String {
        payload.to_string()
    }
}

/// State and operations for one concrete actor kind.
pub enum Behavior {
    Numeric { value: i64, op: NumericOp },
    Text { value: String, op: TextOp },
}

impl Behavior {
    /// Numeric behavior starting at zero.
    pub fn numeric(op: NumericOp) -> Self {
        Behavior::Numeric { value: 0, op }
    }

    /// Text behavior starting empty.
    pub fn text(op: TextOp) -> Self {
        Behavior::Text {
            value: String::new(),
            op,
        }
    }

    /// Kind tag used in logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Behavior::Numeric { .. } => "numeric",
            Behavior::Text { .. } => "text",
        }
    }

    /// Current state as a message payload.
    pub fn value(&self) -> Value {
        match self {
            Behavior::Numeric { value, .. } => Value::Int(*value),
            Behavior::Text { value, .. } => Value::Text(value.clone()),
        }
    }

    /// Overwrite state from a payload of the matching variant.
    pub fn store(&mut self, payload: &Value) -> Result<()> {
        match (self, payload) {
            (Behavior::Numeric { value, .. }, Value::Int(n)) => {
                *value = *n;
                Ok(())
            }
            (Behavior::Text { value, .. }, Value::Text(s)) => {
                *value = s.clone();
                Ok(())
            }
            (behavior, payload) => Err(behavior.mismatch(payload)),
        }
    }

    /// Fold a payload of the matching variant into the state via the
    /// strategy function.
    pub fn apply(&mut self, payload: &Value) -> Result<()> {
        match (self, payload) {
            (Behavior::Numeric { value, op }, Value::Int(n)) => {
                *value = op(*value, *n);
                Ok(())
            }
            (Behavior::Text { value, op }, Value::Text(s)) => {
                *value = op(value, s);
                Ok(())
            }
            (behavior, payload) => Err(behavior.mismatch(payload)),
        }
    }

    /// Seed value a freshly spawned child starts from.
    ///
    /// Numeric actors hand down a modulus-and-offset of their state; text
    /// actors hand down a random reordering of theirs.
    pub fn derive_seed(&self) -> Value {
        match self {
            Behavior::Numeric { value, .. } => Value::Int((value % 10) + 2),
            Behavior::Text { value, .. } => {
                let mut chars: Vec<char> = value.chars().collect();
                chars.shuffle(&mut rand::thread_rng());
                Value::Text(chars.into_iter().collect())
            }
        }
    }

    /// A blank behavior of the same concrete kind, sharing the strategy.
    /// Used to build children during spawn-down.
    pub fn fresh(&self) -> Self {
        match self {
            Behavior::Numeric { op, .. } => Behavior::numeric(*op),
            Behavior::Text { op, .. } => Behavior::text(*op),
        }
    }

    fn expected(&self) -> &'static str {
        match self {
            Behavior::Numeric { .. } => "Int",
            Behavior::Text { .. } => "Text",
        }
    }

    fn mismatch(&self, payload: &Value) -> ActorError {
        ActorError::PayloadMismatch {
            expected: self.expected(),
            found: payload.type_name(),
        }
    }
}
