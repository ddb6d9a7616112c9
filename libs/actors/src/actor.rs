//! Actor Core
//!
//! Lifecycle, the processing loop, handler dispatch, and the spawn-or-reply
//! propagation policy.
//!
//! Each actor runs on a dedicated OS thread and is the sole consumer of its
//! mailbox, so behavior state needs no internal lock: only the loop thread
//! ever touches it. Everyone else interacts with the actor through a cheap
//! cloneable [`ActorRef`] that enqueues messages and flips the stop flag.
//!
//! # Lifecycle
//!
//! ```text
//! Created --start()--> Running --stop()--> Stopped (terminal)
//! ```
//!
//! Cancellation is cooperative: `stop()` clears the running flag and the
//! loop observes it at the top of its next iteration, bounded by the
//! configured poll interval. An in-flight handler always completes.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;

use tracing::{debug, info, warn};

use crate::behavior::Behavior;
use crate::config::RuntimeConfig;
use crate::error::{ActorError, Result};
use crate::mailbox::Mailbox;
use crate::messages::{kind, ActorId, Message, Value};
use crate::metrics::RuntimeMetrics;
use crate::registry::ActorRegistry;

/// Where an actor is in its lifecycle. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RunState {
    Created = 0,
    Running = 1,
    Stopped = 2,
}

impl RunState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => RunState::Created,
            1 => RunState::Running,
            _ => RunState::Stopped,
        }
    }
}

/// Shared handle to an actor: its name, its mailbox, and its run flag.
///
/// This is what the registry stores and what `Value::Actor` carries. The
/// handle does not own the actor's thread or state; dropping every clone
/// does not stop the loop.
#[derive(Clone)]
pub struct ActorRef {
    id: ActorId,
    mailbox: Arc<Mailbox>,
    state: Arc<AtomicU8>,
}

impl ActorRef {
    /// A handle with a live mailbox but no processing loop behind it.
    ///
    /// Useful as a message sink: anything enqueued stays in the mailbox
    /// until popped by hand.
    pub fn detached(id: ActorId) -> Self {
        Self {
            id,
            mailbox: Arc::new(Mailbox::new()),
            state: Arc::new(AtomicU8::new(RunState::Created as u8)),
        }
    }

    pub fn id(&self) -> &ActorId {
        &self.id
    }

    /// Enqueue a message into this actor's mailbox. Never blocks.
    pub fn send(&self, msg: Message) {
        self.mailbox.push(msg);
    }

    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    pub fn run_state(&self) -> RunState {
        RunState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_running(&self) -> bool {
        self.run_state() == RunState::Running
    }

    /// Request a cooperative stop. Idempotent; the loop exits within one
    /// poll interval. Does not interrupt an in-flight handler.
    pub fn stop(&self) {
        let prev = self.state.swap(RunState::Stopped as u8, Ordering::AcqRel);
        if RunState::from_u8(prev) == RunState::Stopped {
            debug!(actor_id = %self.id, "stop on already-stopped actor ignored");
        } else {
            debug!(actor_id = %self.id, "stop requested");
        }
    }

    /// Whether two handles point at the same underlying mailbox.
    pub fn same_actor(&self, other: &ActorRef) -> bool {
        Arc::ptr_eq(&self.mailbox, &other.mailbox)
    }
}

impl fmt::Debug for ActorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorRef")
            .field("id", &self.id)
            .field("state", &self.run_state())
            .field("queued", &self.mailbox.len())
            .finish()
    }
}

impl PartialEq for ActorRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ActorRef {}

/// Handler invoked for one message kind.
type Handler = fn(&mut Actor, &Message) -> Result<()>;

/// A schedulable unit: identity, mailbox, handler table, behavior state.
///
/// Construction wires the fixed `store` / `op` / `send` vocabulary into the
/// handler table; `result` is reserved and consumed by the loop itself.
pub struct Actor {
    handle: ActorRef,
    behavior: Behavior,
    handlers: HashMap<&'static str, Handler>,
    registry: Arc<ActorRegistry>,
    config: RuntimeConfig,
    metrics: Arc<RuntimeMetrics>,
    child_counter: u64,
}

impl Actor {
    /// Actor with default configuration and private metrics.
    pub fn new(id: impl Into<ActorId>, behavior: Behavior, registry: Arc<ActorRegistry>) -> Self {
        Self::with_config(
            id,
            behavior,
            registry,
            RuntimeConfig::default(),
            Arc::new(RuntimeMetrics::default()),
        )
    }

    /// Actor with explicit configuration and shared metrics. Children
    /// spawned by this actor inherit both.
    pub fn with_config(
        id: impl Into<ActorId>,
        behavior: Behavior,
        registry: Arc<ActorRegistry>,
        config: RuntimeConfig,
        metrics: Arc<RuntimeMetrics>,
    ) -> Self {
        let mut handlers: HashMap<&'static str, Handler> = HashMap::new();
        handlers.insert(kind::STORE, Self::handle_store);
        handlers.insert(kind::OP, Self::handle_op);
        handlers.insert(kind::SEND, Self::handle_send);

        Self {
            handle: ActorRef::detached(id.into()),
            behavior,
            handlers,
            registry,
            config,
            metrics,
            child_counter: 0,
        }
    }

    pub fn id(&self) -> &ActorId {
        self.handle.id()
    }

    /// A shareable handle to this actor.
    pub fn actor_ref(&self) -> ActorRef {
        self.handle.clone()
    }

    /// Current behavior state as a payload value.
    pub fn state_value(&self) -> Value {
        self.behavior.value()
    }

    /// Transition `Created -> Running` and launch the processing loop on a
    /// dedicated named thread. Starting an actor twice, or starting one that
    /// was already stopped, is a reported no-op.
    pub fn start(self) -> ActorRef {
        let handle = self.actor_ref();
        let swapped = handle.state.compare_exchange(
            RunState::Created as u8,
            RunState::Running as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        if swapped.is_err() {
            warn!(
                actor_id = %handle.id,
                state = ?handle.run_state(),
                "start ignored, actor is not in the Created state"
            );
            return handle;
        }

        self.metrics.record_start();
        let thread_name = handle.id.to_string();
        thread::Builder::new()
            .name(thread_name)
            .spawn(move || self.run_loop())
            .expect("failed to spawn actor thread");
        handle
    }

    /// The processing loop. Blocks on the mailbox up to the poll interval
    /// per iteration so the stop flag is observed promptly.
    fn run_loop(mut self) {
        info!(
            actor_id = %self.handle.id,
            behavior = self.behavior.kind_name(),
            "actor loop started"
        );
        while self.handle.is_running() {
            if let Some(msg) = self.handle.mailbox.pop_timeout(self.config.poll_interval) {
                self.process(msg);
            }
        }
        self.metrics.record_stop();
        info!(actor_id = %self.handle.id, "actor loop stopped");
    }

    /// Dispatch a single message, reporting and absorbing any failure.
    ///
    /// This is the loop body; it is public so an unstarted actor can be
    /// driven synchronously.
    pub fn process(&mut self, msg: Message) {
        self.metrics.record_message();
        match self.dispatch(&msg) {
            Ok(()) => {}
            Err(err @ ActorError::UnknownKind { .. }) => {
                self.metrics.record_unknown_kind();
                warn!(actor_id = %self.handle.id, %err, "message discarded");
            }
            Err(err @ ActorError::PayloadMismatch { .. }) => {
                self.metrics.record_payload_mismatch();
                warn!(
                    actor_id = %self.handle.id,
                    kind = %msg.kind,
                    %err,
                    "payload ignored, state unchanged"
                );
            }
            Err(err) => {
                warn!(actor_id = %self.handle.id, kind = %msg.kind, %err, "message handling failed");
            }
        }
    }

    fn dispatch(&mut self, msg: &Message) -> Result<()> {
        // Reserved kind: a terminal reply is rendered, never dispatched.
        if msg.kind == kind::RESULT {
            self.render_result(msg);
            return Ok(());
        }

        let handler = self
            .handlers
            .get(msg.kind.as_str())
            .copied()
            .ok_or_else(|| ActorError::UnknownKind {
                kind: msg.kind.clone(),
            })?;
        handler(self, msg)?;

        // Chaining: a handled message whose reply target resolves re-invokes
        // the propagation policy. `send` already propagated above, so it is
        // exempt from the re-invocation.
        if msg.kind != kind::SEND {
            if let Some(target) = &msg.reply_to {
                if self.registry.get(target).is_some() {
                    debug!(
                        actor_id = %self.handle.id,
                        target = %target,
                        "reply target live, chaining propagation"
                    );
                    self.propagate(msg)?;
                }
            }
        }
        Ok(())
    }

    fn handle_store(actor: &mut Actor, msg: &Message) -> Result<()> {
        actor.behavior.store(&msg.payload)?;
        debug!(
            actor_id = %actor.handle.id,
            value = %actor.behavior.value(),
            "stored value"
        );
        Ok(())
    }

    fn handle_op(actor: &mut Actor, msg: &Message) -> Result<()> {
        actor.behavior.apply(&msg.payload)?;
        debug!(
            actor_id = %actor.handle.id,
            value = %actor.behavior.value(),
            "applied operation"
        );
        Ok(())
    }

    fn handle_send(actor: &mut Actor, msg: &Message) -> Result<()> {
        actor.propagate(msg)
    }

    /// The spawn-or-reply policy.
    ///
    /// A resolvable reply target gets exactly one `result` message carrying
    /// the current state ("send up"). An unresolvable one makes this actor
    /// spawn, register, and seed a child of its own kind ("send down"),
    /// leaving its own name as the child's reply target.
    fn propagate(&mut self, msg: &Message) -> Result<()> {
        match msg.reply_to.as_ref().and_then(|target| self.registry.get(target)) {
            Some(target) => {
                debug!(
                    actor_id = %self.handle.id,
                    target = %target.id(),
                    "sending result up"
                );
                target.send(Message::result(self.behavior.value()));
                Ok(())
            }
            None => self.spawn_child(),
        }
    }

    fn spawn_child(&mut self) -> Result<()> {
        if let Some(limit) = self.config.max_actors {
            if self.registry.len() >= limit {
                return Err(ActorError::SpawnLimit { limit });
            }
        }

        self.child_counter += 1;
        let child_id = ActorId::from(format!("{}.{}", self.handle.id, self.child_counter));
        let seed = self.behavior.derive_seed();

        let child = Actor::with_config(
            child_id,
            self.behavior.fresh(),
            Arc::clone(&self.registry),
            self.config.clone(),
            Arc::clone(&self.metrics),
        );
        // Register before starting; a name conflict abandons the spawn and
        // leaves the existing registration untouched.
        self.registry.add(child.actor_ref())?;
        let child_ref = child.start();
        child_ref.send(Message::store(seed.clone(), Some(self.handle.id.clone())));

        info!(
            actor_id = %self.handle.id,
            child = %child_ref.id(),
            seed = %seed,
            "sending down, spawned child actor"
        );
        Ok(())
    }

    fn render_result(&self, msg: &Message) {
        self.metrics.record_result();
        info!(actor_id = %self.handle.id, value = %msg.payload, "result received");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{ops, Behavior};
    use std::time::{Duration, Instant};

    fn test_config() -> RuntimeConfig {
        RuntimeConfig::new().poll_interval(Duration::from_millis(10))
    }

    fn numeric_actor(name: &str, registry: &Arc<ActorRegistry>) -> Actor {
        Actor::with_config(
            name,
            Behavior::numeric(ops::multiply),
            Arc::clone(registry),
            test_config(),
            Arc::new(RuntimeMetrics::default()),
        )
    }

    /// Poll a detached sink until a message shows up or the deadline hits.
    fn wait_for_message(sink: &ActorRef, timeout: Duration) -> Option<Message> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(msg) = sink.mailbox().try_pop() {
                return Some(msg);
            }
            if Instant::now() >= deadline {
                return None;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn store_then_op_updates_state() {
        let registry = Arc::new(ActorRegistry::new());
        let mut actor = numeric_actor("calc", &registry);

        actor.process(Message::store(Value::Int(7), None));
        actor.process(Message::op(Value::Int(22), None));
        assert_eq!(actor.state_value(), Value::Int(154));
    }

    #[test]
    fn unknown_kind_is_reported_and_skipped() {
        let registry = Arc::new(ActorRegistry::new());
        let mut actor = numeric_actor("calc", &registry);
        actor.process(Message::store(Value::Int(3), None));

        actor.process(Message::new("frobnicate", Value::Int(9), None));
        assert_eq!(actor.state_value(), Value::Int(3));
        assert_eq!(actor.metrics.snapshot().unknown_kinds, 1);
    }

    #[test]
    fn mismatched_payload_is_reported_and_skipped() {
        let registry = Arc::new(ActorRegistry::new());
        let mut actor = numeric_actor("calc", &registry);
        actor.process(Message::store(Value::Int(3), None));

        actor.process(Message::op(Value::Text("oops".into()), None));
        assert_eq!(actor.state_value(), Value::Int(3));
        assert_eq!(actor.metrics.snapshot().payload_mismatches, 1);
    }

    #[test]
    fn result_kind_is_rendered_not_dispatched() {
        let registry = Arc::new(ActorRegistry::new());
        let mut actor = numeric_actor("calc", &registry);

        actor.process(Message::result(Value::Int(42)));
        assert_eq!(actor.state_value(), Value::Int(0));
        assert_eq!(actor.metrics.snapshot().results_rendered, 1);
        assert_eq!(actor.metrics.snapshot().unknown_kinds, 0);
    }

    #[test]
    fn send_up_enqueues_exactly_one_result_and_spawns_nothing() {
        let registry = Arc::new(ActorRegistry::new());
        let collector = ActorRef::detached(ActorId::from("collector"));
        registry.add(collector.clone()).unwrap();

        let mut actor = numeric_actor("calc", &registry);
        actor.process(Message::store(Value::Int(154), None));
        actor.process(Message::send(Value::Int(0), Some(ActorId::from("collector"))));

        assert_eq!(collector.mailbox().len(), 1);
        assert_eq!(
            collector.mailbox().try_pop(),
            Some(Message::result(Value::Int(154)))
        );
        // Only the collector is registered; no child appeared.
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn send_down_registers_and_seeds_one_child() {
        let registry = Arc::new(ActorRegistry::new());
        let collector = ActorRef::detached(ActorId::from("collector"));
        registry.add(collector.clone()).unwrap();

        let mut actor = numeric_actor("root", &registry);
        actor.process(Message::store(Value::Int(154), None));
        // Unresolvable reply target selects the spawn-down branch.
        actor.process(Message::send(Value::Int(0), Some(ActorId::from("ghost"))));

        assert_eq!(registry.len(), 2);
        let child = registry.get(&ActorId::from("root.1")).expect("child registered");
        assert!(child.is_running());

        // The child stored the documented transform of the parent's state.
        // Ask it to reply to the collector to observe it.
        child.send(Message::send(Value::Int(0), Some(ActorId::from("collector"))));
        let reply = wait_for_message(&collector, Duration::from_secs(2)).expect("child replied");
        assert_eq!(reply, Message::result(Value::Int((154 % 10) + 2)));

        child.stop();
    }

    #[test]
    fn chaining_propagates_after_store_with_live_reply_target() {
        let registry = Arc::new(ActorRegistry::new());
        let parent = ActorRef::detached(ActorId::from("parent"));
        registry.add(parent.clone()).unwrap();

        let mut actor = numeric_actor("child", &registry);
        actor.process(Message::store(Value::Int(6), Some(ActorId::from("parent"))));

        assert_eq!(
            parent.mailbox().try_pop(),
            Some(Message::result(Value::Int(6)))
        );
    }

    #[test]
    fn chaining_skips_dead_reply_targets() {
        let registry = Arc::new(ActorRegistry::new());
        let mut actor = numeric_actor("child", &registry);

        actor.process(Message::store(Value::Int(6), Some(ActorId::from("nobody"))));
        // Nothing resolvable, nothing spawned: store alone never sends down.
        assert!(registry.is_empty());
        assert_eq!(actor.state_value(), Value::Int(6));
    }

    #[test]
    fn spawn_ceiling_turns_send_down_into_a_no_op() {
        let registry = Arc::new(ActorRegistry::new());
        let mut actor = Actor::with_config(
            "root",
            Behavior::numeric(ops::multiply),
            Arc::clone(&registry),
            test_config().max_actors(1),
            Arc::new(RuntimeMetrics::default()),
        );
        registry.add(actor.actor_ref()).unwrap();

        actor.process(Message::send(Value::Int(0), None));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn stop_is_idempotent_and_terminal() {
        let registry = Arc::new(ActorRegistry::new());
        let actor = numeric_actor("calc", &registry);
        let handle = actor.actor_ref();

        assert_eq!(handle.run_state(), RunState::Created);
        handle.stop();
        handle.stop();
        assert_eq!(handle.run_state(), RunState::Stopped);
    }

    #[test]
    fn started_actor_observes_stop_within_the_poll_interval() {
        let registry = Arc::new(ActorRegistry::new());
        let metrics = Arc::new(RuntimeMetrics::default());
        let actor = Actor::with_config(
            "calc",
            Behavior::numeric(ops::multiply),
            Arc::clone(&registry),
            test_config(),
            Arc::clone(&metrics),
        );

        let handle = actor.start();
        assert!(handle.is_running());
        handle.stop();

        let deadline = Instant::now() + Duration::from_secs(2);
        while metrics.snapshot().actors_stopped == 0 {
            assert!(Instant::now() < deadline, "loop never exited");
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(handle.run_state(), RunState::Stopped);
    }

    #[test]
    fn start_after_stop_is_a_no_op() {
        let registry = Arc::new(ActorRegistry::new());
        let metrics = Arc::new(RuntimeMetrics::default());
        let actor = Actor::with_config(
            "calc",
            Behavior::numeric(ops::multiply),
            Arc::clone(&registry),
            test_config(),
            Arc::clone(&metrics),
        );
        actor.actor_ref().stop();

        let handle = actor.start();
        assert_eq!(handle.run_state(), RunState::Stopped);
        assert_eq!(metrics.snapshot().actors_started, 0);
    }
}
