//! Chainmail Actor Runtime
//!
//! Minimal thread-per-actor runtime: independently scheduled actors that
//! communicate only through per-actor FIFO mailboxes, discover each other by
//! name in a shared registry, and extend computation chains dynamically
//! through a spawn-or-reply propagation policy.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐  store/op/send   ┌─────────────────────────────┐
//! │   Driver   │ ───────────────► │ Actor "a"                   │
//! └────────────┘                  │  mailbox ── loop ── handlers│
//!                                 └──────┬──────────────────────┘
//!                 reply target resolves? │ propagation
//!                      ┌─────────────────┴───────────────┐
//!                      ▼ yes ("send up")                 ▼ no ("send down")
//!              ┌───────────────┐                 ┌───────────────────┐
//!              │ result(state) │                 │ spawn child "a.1" │
//!              │ to the target │                 │ register + seed   │
//!              └───────────────┘                 └───────────────────┘
//! ```
//!
//! Every actor owns one OS thread and one mailbox. The registry is a plain
//! value shared by `Arc`, handed to each actor at construction; there is no
//! global state.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use chainmail_actors::{
//!     ops, Actor, ActorRegistry, Behavior, Message, Value,
//! };
//!
//! let registry = Arc::new(ActorRegistry::new());
//! let actor = Actor::new("calc", Behavior::numeric(ops::multiply), Arc::clone(&registry));
//! registry.add(actor.actor_ref()).unwrap();
//!
//! let calc = actor.start();
//! calc.send(Message::store(Value::Int(7), None));
//! calc.send(Message::op(Value::Int(22), None));
//! // ... later
//! calc.stop();
//! ```

pub mod actor;
pub mod behavior;
pub mod config;
pub mod error;
pub mod mailbox;
pub mod messages;
pub mod metrics;
pub mod registry;

pub use actor::{Actor, ActorRef, RunState};
pub use behavior::{ops, Behavior, NumericOp, TextOp};
pub use config::RuntimeConfig;
pub use error::{ActorError, Result};
pub use mailbox::Mailbox;
pub use messages::{kind, ActorId, Message, Value};
pub use metrics::{MetricsSnapshot, RuntimeMetrics};
pub use registry::ActorRegistry;
