//! Per-Actor Mailbox
//!
//! Unbounded, thread-safe FIFO queue of [`Message`]s owned by exactly one
//! actor. Any number of producer threads may enqueue concurrently; the owning
//! actor's loop thread is the single consumer. Enqueue never blocks and never
//! applies backpressure.
//!
//! The consumer side offers both a non-blocking `try_pop` (explicit empty
//! result) and a bounded blocking `pop_timeout` built on a condition
//! variable, so an idle actor parks instead of spinning while still waking
//! often enough to observe its stop flag.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::messages::Message;

/// Thread-safe FIFO message queue.
pub struct Mailbox {
    queue: Mutex<VecDeque<Message>>,
    available: Condvar,
}

impl Mailbox {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }

    /// Append a message at the tail and wake the consumer.
    ///
    /// Returns immediately; the queue is unbounded.
    pub fn push(&self, msg: Message) {
        let mut queue = self.queue.lock();
        queue.push_back(msg);
        drop(queue);
        self.available.notify_one();
    }

    /// Remove and return the head, or `None` when the queue is empty.
    ///
    /// Never blocks waiting for a producer.
    pub fn try_pop(&self) -> Option<Message> {
        self.queue.lock().pop_front()
    }

    /// Remove and return the head, waiting up to `timeout` for one to
    /// arrive.
    ///
    /// The bound exists so the owning loop can re-check its running flag at
    /// a fixed cadence even when no messages show up.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<Message> {
        let deadline = Instant::now() + timeout;
        let mut queue = self.queue.lock();
        loop {
            if let Some(msg) = queue.pop_front() {
                return Some(msg);
            }
            if self.available.wait_until(&mut queue, deadline).timed_out() {
                // One last look: a producer may have slipped in between the
                // timeout firing and the lock being reacquired.
                return queue.pop_front();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::new()
    }
}
