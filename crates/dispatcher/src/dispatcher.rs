//! Dispatcher - drives one batch through one sink

use std::sync::Arc;

use contracts::{Batch, ContractError, EmitReport, OutputConfig, RecordSink};
use tracing::{info, instrument, warn};

use crate::error::DispatcherError;
use crate::factory::{Sink, SinkFactory};
use crate::metrics::SinkMetrics;

/// Emit `batch` through `sink`, then release it
///
/// `release` runs whether or not `emit` succeeded; the emit result is
/// returned unchanged.
#[instrument(name = "dispatch", skip(sink, batch), fields(sink = %sink.name(), records = batch.len()))]
pub async fn dispatch<S: RecordSink>(
    sink: &mut S,
    batch: &Batch,
) -> Result<EmitReport, ContractError> {
    let result = sink.emit(batch).await;
    sink.release().await;

    let name = sink.name().to_string();
    match &result {
        Ok(report) => {
            ::metrics::counter!("csv_relay_records_delivered_total", "sink" => name.clone())
                .increment(report.delivered as u64);
            ::metrics::counter!("csv_relay_records_failed_total", "sink" => name.clone())
                .increment(report.failed as u64);
            ::metrics::counter!("csv_relay_flushes_total", "sink" => name)
                .increment(report.flushes as u64);
        }
        Err(e) => warn!(error = %e, "Emit failed"),
    }
    result
}

/// Owns the single sink of a run
pub struct Dispatcher<S: RecordSink = Sink> {
    sink: S,
    metrics: Arc<SinkMetrics>,
}

impl<S: RecordSink> Dispatcher<S> {
    /// Create a dispatcher around an already built sink
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            metrics: Arc::new(SinkMetrics::new()),
        }
    }

    pub fn sink_name(&self) -> &str {
        self.sink.name()
    }

    /// Shared metrics handle, still readable after `run` consumed the dispatcher
    pub fn metrics(&self) -> Arc<SinkMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Dispatch the batch; the sink is released and dropped afterwards
    #[instrument(name = "dispatcher_run", skip(self, batch))]
    pub async fn run(mut self, batch: &Batch) -> Result<EmitReport, DispatcherError> {
        info!(sink = %self.sink.name(), records = batch.len(), "Dispatcher started");

        let report = dispatch(&mut self.sink, batch).await?;
        self.metrics.record(&report);

        info!(
            delivered = report.delivered,
            failed = report.failed,
            "Dispatcher finished"
        );
        Ok(report)
    }
}

/// Build the sink named by `identifier` and wrap it in a dispatcher
#[instrument(name = "dispatcher_create", skip(output))]
pub async fn create_dispatcher(
    identifier: &str,
    output: &OutputConfig,
) -> Result<Dispatcher, DispatcherError> {
    let sink = SinkFactory::create(identifier, output)
        .await
        .map_err(|e| DispatcherError::sink_creation(identifier, e))?;
    Ok(Dispatcher::new(sink))
}
