//! Runtime Metrics
//!
//! Relaxed atomic counters shared by every actor in a runtime. Counters only
//! ever increase; `snapshot` gives a consistent-enough view for logs and
//! tests.

use std::sync::atomic::{AtomicU64, Ordering};

/// System-wide counters.
#[derive(Debug, Default)]
pub struct RuntimeMetrics {
    pub messages_processed: AtomicU64,
    pub results_rendered: AtomicU64,
    pub actors_started: AtomicU64,
    pub actors_stopped: AtomicU64,
    pub unknown_kinds: AtomicU64,
    pub payload_mismatches: AtomicU64,
}

/// Plain copy of the counters at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub messages_processed: u64,
    pub results_rendered: u64,
    pub actors_started: u64,
    pub actors_stopped: u64,
    pub unknown_kinds: u64,
    pub payload_mismatches: u64,
}

impl RuntimeMetrics {
    pub fn record_message(&self) {
        self.messages_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_result(&self) {
        self.results_rendered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_start(&self) {
        self.actors_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stop(&self) {
        self.actors_stopped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unknown_kind(&self) {
        self.unknown_kinds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_payload_mismatch(&self) {
        self.payload_mismatches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_processed: self.messages_processed.load(Ordering::Relaxed),
            results_rendered: self.results_rendered.load(Ordering::Relaxed),
            actors_started: self.actors_started.load(Ordering::Relaxed),
            actors_stopped: self.actors_stopped.load(Ordering::Relaxed),
            unknown_kinds: self.unknown_kinds.load(Ordering::Relaxed),
            payload_mismatches: self.payload_mismatches.load(Ordering::Relaxed),
        }
    }
}
