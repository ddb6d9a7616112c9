//! Demo driver for the actor runtime.
//!
//! Builds a registry, starts a numeric and a text actor, seeds them with
//! work, lets them chat for a few seconds, then stops everything. Run with
//! `RUST_LOG=debug` to watch the message routing.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chainmail_actors::{
    ops, Actor, ActorId, ActorRegistry, Behavior, Message, RuntimeConfig, RuntimeMetrics, Value,
};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chainmail_actors=info,chainmail_demo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let registry = Arc::new(ActorRegistry::new());
    let config = RuntimeConfig::new().poll_interval(Duration::from_millis(50));
    let metrics = Arc::new(RuntimeMetrics::default());

    let numeric = Actor::with_config(
        "numeric_actor",
        Behavior::numeric(ops::multiply),
        Arc::clone(&registry),
        config.clone(),
        Arc::clone(&metrics),
    );
    let text = Actor::with_config(
        "string_actor",
        Behavior::text(ops::append),
        Arc::clone(&registry),
        config.clone(),
        Arc::clone(&metrics),
    );

    registry.add(numeric.actor_ref())?;
    registry.add(text.actor_ref())?;

    let numeric = numeric.start();
    let text = text.start();

    // Seed the numeric chain: 7 * 22, then propagate. The reply target does
    // not resolve, so the actor sends down and spawns a child.
    numeric.send(Message::store(Value::Int(7), None));
    numeric.send(Message::op(Value::Int(22), None));
    numeric.send(Message::send(Value::Int(0), Some(ActorId::from("downstream"))));

    // Seed the text chain and route its result back to the numeric actor,
    // which renders it.
    text.send(Message::store(Value::Text("hello".into()), None));
    text.send(Message::op(Value::Text("world".into()), None));
    text.send(Message::send(Value::Int(0), Some(ActorId::from("numeric_actor"))));

    thread::sleep(Duration::from_secs(3));

    // Stop every actor still in the registry, spawned children included.
    for name in registry.names() {
        if let Some(actor) = registry.get(&name) {
            actor.stop();
        }
    }
    thread::sleep(Duration::from_millis(200));

    let snap = metrics.snapshot();
    info!(
        messages = snap.messages_processed,
        results = snap.results_rendered,
        started = snap.actors_started,
        stopped = snap.actors_stopped,
        "demo finished"
    );
    Ok(())
}
