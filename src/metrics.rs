//! Counters for a batch run

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use serde::Serialize;

/// Invocation and outcome counters
pub struct Metrics {
    pub videos_total: AtomicU64,
    pub videos_succeeded: AtomicU64,
    pub videos_failed: AtomicU64,
    pub total_latency_ms: AtomicU64,

    // Per-tool-mode counters
    pub probe_count: AtomicU64,
    pub extract_count: AtomicU64,
    pub composite_count: AtomicU64,
}

#[derive(Debug, Clone, Copy)]
pub enum Invocation {
    Probe,
    Extract,
    Composite,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_invocation(&self, kind: Invocation, count: u64) {
        let counter = match kind {
            Invocation::Probe => &self.probe_count,
            Invocation::Extract => &self.extract_count,
            Invocation::Composite => &self.composite_count,
        };
        counter.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_video(&self, success: bool, latency_ms: u64) {
        self.videos_total.fetch_add(1, Ordering::Relaxed);

        if success {
            self.videos_succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.videos_failed.fetch_add(1, Ordering::Relaxed);
        }

        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let total = self.videos_total.load(Ordering::Relaxed);
        let succeeded = self.videos_succeeded.load(Ordering::Relaxed);
        let failed = self.videos_failed.load(Ordering::Relaxed);
        let total_latency = self.total_latency_ms.load(Ordering::Relaxed);

        MetricsSnapshot {
            videos_total: total,
            videos_succeeded: succeeded,
            videos_failed: failed,
            error_rate: if total > 0 { failed as f64 / total as f64 } else { 0.0 },
            avg_latency_ms: if total > 0 { total_latency / total } else { 0 },
            invocations: InvocationMetrics {
                probe: self.probe_count.load(Ordering::Relaxed),
                extract: self.extract_count.load(Ordering::Relaxed),
                composite: self.composite_count.load(Ordering::Relaxed),
            },
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            videos_total: AtomicU64::new(0),
            videos_succeeded: AtomicU64::new(0),
            videos_failed: AtomicU64::new(0),
            total_latency_ms: AtomicU64::new(0),
            probe_count: AtomicU64::new(0),
            extract_count: AtomicU64::new(0),
            composite_count: AtomicU64::new(0),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub videos_total: u64,
    pub videos_succeeded: u64,
    pub videos_failed: u64,
    pub error_rate: f64,
    pub avg_latency_ms: u64,
    pub invocations: InvocationMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvocationMetrics {
    pub probe: u64,
    pub extract: u64,
    pub composite: u64,
}

/// Timer for tracking per-video latency
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
