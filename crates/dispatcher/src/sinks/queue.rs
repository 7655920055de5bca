//! QueueSink - publishes one JSON message per record

use contracts::{Batch, ContractError, EmitReport, QueueSinkConfig, RecordSink};
use tracing::{info, instrument, warn};

use crate::transport::{KafkaPublisher, MessagePublisher};

const SINK_NAME: &str = "queue";

/// Progress is reported on records 1, 1 + interval, 1 + 2 * interval, ...
fn is_progress_point(index: usize, interval: usize) -> bool {
    interval > 0 && index % interval == 0
}

/// Sink that publishes every record to a message broker topic
///
/// Each publish waits for the broker acknowledgment before the next record
/// is sent.
pub struct QueueSink<P: MessagePublisher = KafkaPublisher> {
    publisher: P,
    config: QueueSinkConfig,
    emitted: bool,
    released: bool,
}

impl QueueSink<KafkaPublisher> {
    /// Connect to the configured brokers
    ///
    /// # Errors
    /// `ContractError::SinkConnection` when no broker answers in time
    #[instrument(
        name = "queue_sink_connect",
        skip(config),
        fields(topic = %config.topic)
    )]
    pub async fn connect(config: &QueueSinkConfig) -> Result<Self, ContractError> {
        let publisher = KafkaPublisher::connect(config).await?;
        Ok(Self::with_publisher(publisher, config.clone()))
    }
}

impl<P: MessagePublisher> QueueSink<P> {
    /// Create a QueueSink over an already connected publisher
    pub fn with_publisher(publisher: P, config: QueueSinkConfig) -> Self {
        Self {
            publisher,
            config,
            emitted: false,
            released: false,
        }
    }

    pub fn topic(&self) -> &str {
        &self.config.topic
    }
}

impl<P: MessagePublisher> RecordSink for QueueSink<P> {
    fn name(&self) -> &str {
        SINK_NAME
    }

    #[instrument(
        name = "queue_sink_emit",
        skip(self, batch),
        fields(topic = %self.config.topic, records = batch.len())
    )]
    async fn emit(&mut self, batch: &Batch) -> Result<EmitReport, ContractError> {
        if std::mem::replace(&mut self.emitted, true) {
            return Err(ContractError::AlreadyEmitted {
                sink_name: SINK_NAME.to_string(),
            });
        }

        info!(topic = %self.config.topic, "Publishing records");

        let ack_timeout = self.config.ack_timeout();
        let mut report = EmitReport::default();

        for (index, record) in batch.iter().enumerate() {
            report.attempted += 1;

            let payload = match record.to_json_bytes() {
                Ok(payload) => payload,
                Err(e) => {
                    warn!(index, error = %e, "Record serialization failed, skipping");
                    report.failed += 1;
                    continue;
                }
            };

            match self
                .publisher
                .publish(&self.config.topic, payload, ack_timeout)
                .await
            {
                Ok(()) => {
                    report.delivered += 1;
                    if is_progress_point(index, self.config.progress_interval) {
                        info!(published = index + 1, "Publish progress");
                    }
                }
                Err(e) => {
                    warn!(index, error = %e, "Publish failed, skipping");
                    report.failed += 1;
                }
            }
        }

        info!(
            attempted = report.attempted,
            delivered = report.delivered,
            failed = report.failed,
            "Publishing finished"
        );
        Ok(report)
    }

    #[instrument(name = "queue_sink_release", skip(self))]
    async fn release(&mut self) {
        if std::mem::replace(&mut self.released, true) {
            return;
        }

        if let Err(e) = self.publisher.flush(self.config.ack_timeout()).await {
            warn!(error = %e, "Flush on release failed");
        }
        match self.publisher.close().await {
            Ok(()) => info!("Queue connection closed"),
            Err(e) => warn!(error = %e, "Closing queue connection failed"),
        }
    }
}
