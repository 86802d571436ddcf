use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

/// Dispatch counters, updated with relaxed atomics.
///
/// Counters are eventually consistent; they never block a dispatch.
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    dispatched: AtomicU64,
    executed: AtomicU64,
    denied: AtomicU64,
    unmatched: AtomicU64,
    total_latency_ns: AtomicU64,
}

/// Point-in-time copy of [`DispatchMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub dispatched: u64,
    pub executed: u64,
    pub denied: u64,
    pub unmatched: u64,
    pub average_latency_ns: u64,
}

impl DispatchMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_executed(&self, latency: Duration) {
        self.executed.fetch_add(1, Ordering::Relaxed);
        self.record(latency);
    }

    pub(crate) fn record_denied(&self, latency: Duration) {
        self.denied.fetch_add(1, Ordering::Relaxed);
        self.record(latency);
    }

    pub(crate) fn record_unmatched(&self, latency: Duration) {
        self.unmatched.fetch_add(1, Ordering::Relaxed);
        self.record(latency);
    }

    fn record(&self, latency: Duration) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
        let nanos = u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX);
        self.total_latency_ns.fetch_add(nanos, Ordering::Relaxed);
    }

    /// Total number of dispatches, whatever their outcome.
    #[must_use]
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    /// Mean time per dispatch, zero before the first one.
    #[must_use]
    pub fn average_latency(&self) -> Duration {
        let count = self.dispatched();
        if count == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            dispatched: self.dispatched(),
            executed: self.executed.load(Ordering::Relaxed),
            denied: self.denied.load(Ordering::Relaxed),
            unmatched: self.unmatched.load(Ordering::Relaxed),
            average_latency_ns: u64::try_from(self.average_latency().as_nanos())
                .unwrap_or(u64::MAX),
        }
    }
}
