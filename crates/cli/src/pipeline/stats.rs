//! Relay statistics.

use std::time::Duration;

use contracts::EmitReport;
use dispatcher::MetricsSnapshot;
use ingestion::DatasetStatus;

/// Statistics from a relay run
#[derive(Debug, Clone)]
pub struct RelayStats {
    /// Whether the dataset was downloaded in this run
    pub dataset: DatasetStatus,

    /// Records in the bounded batch
    pub records_loaded: usize,

    /// Sink that received the batch (None in download-only mode)
    pub sink: Option<String>,

    /// Emission outcome (None in download-only mode)
    pub report: Option<EmitReport>,

    /// Totals recorded by the dispatcher (None in download-only mode)
    pub sink_metrics: Option<MetricsSnapshot>,

    /// Total duration of the run
    pub duration: Duration,
}

impl RelayStats {
    pub fn new(dataset: DatasetStatus, records_loaded: usize) -> Self {
        Self {
            dataset,
            records_loaded,
            sink: None,
            report: None,
            sink_metrics: None,
            duration: Duration::ZERO,
        }
    }

    /// Whether any record was dispatched
    pub fn dispatched(&self) -> bool {
        self.report.is_some()
    }

    /// Render the summary block printed at the end of a run
    pub fn summary(&self) -> String {
        let mut out = String::from("\n=== Relay Statistics ===\n\n");

        let dataset = match self.dataset {
            DatasetStatus::AlreadyPresent => "already present".to_string(),
            DatasetStatus::Downloaded { bytes } => format!("downloaded ({bytes} bytes)"),
        };
        out.push_str(&format!("   ├─ Dataset: {dataset}\n"));
        out.push_str(&format!("   ├─ Records loaded: {}\n", self.records_loaded));
        out.push_str(&format!("   ├─ Duration: {:.2}s\n", self.duration.as_secs_f64()));

        match (&self.sink, &self.sink_metrics) {
            (Some(sink), Some(totals)) => {
                out.push_str(&format!("   ├─ Sink: {sink}\n"));
                out.push_str(&format!(
                    "   ├─ Delivered: {}/{}\n",
                    totals.delivered_count, totals.attempted_count
                ));
                if totals.flush_count > 0 {
                    out.push_str(&format!("   ├─ Flushes: {}\n", totals.flush_count));
                }
                out.push_str(&format!("   └─ Failed: {}\n", totals.failure_count));
            }
            _ => out.push_str("   └─ Dispatch: skipped (download only)\n"),
        }
        out
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("{}", self.summary());
    }
}
