//! Sink metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::EmitReport;

/// Metrics for a single sink
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Total records handed to the sink
    attempted_count: AtomicU64,
    /// Total records delivered
    delivered_count: AtomicU64,
    /// Total per-record failures
    failure_count: AtomicU64,
    /// Total pipeline round trips
    flush_count: AtomicU64,
}

impl SinkMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempted_count(&self) -> u64 {
        self.attempted_count.load(Ordering::Relaxed)
    }

    pub fn delivered_count(&self) -> u64 {
        self.delivered_count.load(Ordering::Relaxed)
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn flush_count(&self) -> u64 {
        self.flush_count.load(Ordering::Relaxed)
    }

    /// Accumulate the counts of one emit call
    pub fn record(&self, report: &EmitReport) {
        self.attempted_count
            .fetch_add(report.attempted as u64, Ordering::Relaxed);
        self.delivered_count
            .fetch_add(report.delivered as u64, Ordering::Relaxed);
        self.failure_count
            .fetch_add(report.failed as u64, Ordering::Relaxed);
        self.flush_count
            .fetch_add(report.flushes as u64, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            attempted_count: self.attempted_count(),
            delivered_count: self.delivered_count(),
            failure_count: self.failure_count(),
            flush_count: self.flush_count(),
        }
    }
}

/// Snapshot of sink metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub attempted_count: u64,
    pub delivered_count: u64,
    pub failure_count: u64,
    pub flush_count: u64,
}
