//! Metrics sink boundary.
//!
//! Store adapters never touch counters directly. All instrumentation flows
//! through [`StoreEvent`] and a [`MetricsSink`] injected at construction.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

///
/// StoreOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StoreOp {
    Create,
    List,
    Update,
    Delete,
}

///
/// StoreEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StoreEvent {
    Finish { op: StoreOp, rows: u64 },
    Failure { op: StoreOp },
    Denied { op: StoreOp },
}

///
/// MetricsSink
///

pub trait MetricsSink: Send + Sync {
    fn record(&self, event: StoreEvent);
}

///
/// NoopSink
/// Discards every event.
///

pub struct NoopSink;

impl MetricsSink for NoopSink {
    fn record(&self, _: StoreEvent) {}
}

///
/// StoreCounters
/// Process-local counters, safe to share across request tasks.
///

#[derive(Debug, Default)]
pub struct StoreCounters {
    creates: AtomicU64,
    lists: AtomicU64,
    updates: AtomicU64,
    deletes: AtomicU64,
    rows_listed: AtomicU64,
    failures: AtomicU64,
    denied: AtomicU64,
}

impl StoreCounters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Point-in-time copy of every counter.
    #[must_use]
    pub fn snapshot(&self) -> StoreReport {
        StoreReport {
            creates: self.creates.load(Ordering::Relaxed),
            lists: self.lists.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            rows_listed: self.rows_listed.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            denied: self.denied.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters (useful in tests).
    pub fn reset(&self) {
        for counter in [
            &self.creates,
            &self.lists,
            &self.updates,
            &self.deletes,
            &self.rows_listed,
            &self.failures,
            &self.denied,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl MetricsSink for StoreCounters {
    fn record(&self, event: StoreEvent) {
        match event {
            StoreEvent::Finish { op, rows } => {
                let counter = match op {
                    StoreOp::Create => &self.creates,
                    StoreOp::List => {
                        self.rows_listed.fetch_add(rows, Ordering::Relaxed);
                        &self.lists
                    }
                    StoreOp::Update => &self.updates,
                    StoreOp::Delete => &self.deletes,
                };
                counter.fetch_add(1, Ordering::Relaxed);
            }
            StoreEvent::Failure { .. } => {
                self.failures.fetch_add(1, Ordering::Relaxed);
            }
            StoreEvent::Denied { .. } => {
                self.denied.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

///
/// StoreReport
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct StoreReport {
    pub creates: u64,
    pub lists: u64,
    pub updates: u64,
    pub deletes: u64,
    pub rows_listed: u64,
    pub failures: u64,
    pub denied: u64,
}

///
/// TESTS
///
