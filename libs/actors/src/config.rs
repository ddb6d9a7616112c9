//! Runtime Configuration
//!
//! Per-actor knobs shared down the spawn chain: a child inherits its
//! parent's configuration unchanged.

use std::time::Duration;

/// Configuration for actor loop behavior.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Upper bound on how long a stopped actor keeps blocking on its
    /// mailbox before observing the stop flag.
    pub poll_interval: Duration,

    /// Optional ceiling on the number of registered actors. When the
    /// ceiling is reached, spawn-down becomes a reported no-op. `None`
    /// preserves the unbounded-spawn semantics.
    pub max_actors: Option<usize>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            max_actors: None,
        }
    }
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn max_actors(mut self, limit: usize) -> Self {
        self.max_actors = Some(limit);
        self
    }
}
