//! KafkaPublisher - rdkafka backed `MessagePublisher`

use std::time::Duration;

use bytes::Bytes;
use contracts::{ContractError, QueueSinkConfig};
use rdkafka::config::RDKafkaLogLevel;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use rdkafka::ClientConfig;
use tracing::{debug, info, instrument};

use crate::transport::MessagePublisher;

const SINK_NAME: &str = "queue";

/// Kafka producer owning one broker connection
pub struct KafkaPublisher {
    producer: Option<FutureProducer>,
}

impl KafkaPublisher {
    /// Create the producer and verify the brokers answer a metadata request
    ///
    /// # Errors
    /// `ContractError::SinkConnection` when the producer cannot be created or
    /// no broker answers within `connect_timeout`.
    #[instrument(
        name = "kafka_publisher_connect",
        skip(config),
        fields(brokers = %config.bootstrap_servers)
    )]
    pub async fn connect(config: &QueueSinkConfig) -> Result<Self, ContractError> {
        let message_timeout_ms = config.ack_timeout().as_millis().to_string();

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.bootstrap_servers)
            .set("message.timeout.ms", message_timeout_ms)
            .set("client.id", "csv-relay")
            .set_log_level(RDKafkaLogLevel::Warning)
            .create()
            .map_err(|e| {
                ContractError::sink_connection(SINK_NAME, format!("failed to create producer: {e}"))
            })?;

        // Blocking round trip; nothing else runs on the runtime while connecting.
        producer
            .client()
            .fetch_metadata(None, config.connect_timeout())
            .map_err(|e| {
                ContractError::sink_connection(
                    SINK_NAME,
                    format!("brokers {} unreachable: {e}", config.bootstrap_servers),
                )
            })?;

        info!(brokers = %config.bootstrap_servers, "Connected to Kafka");

        Ok(Self {
            producer: Some(producer),
        })
    }

    fn producer(&self) -> Result<&FutureProducer, ContractError> {
        self.producer
            .as_ref()
            .ok_or_else(|| ContractError::sink_write(SINK_NAME, "producer closed"))
    }
}

impl MessagePublisher for KafkaPublisher {
    async fn publish(
        &mut self,
        topic: &str,
        payload: Bytes,
        ack_timeout: Duration,
    ) -> Result<(), ContractError> {
        let producer = self.producer()?;
        let record: FutureRecord<'_, String, [u8]> = FutureRecord::to(topic).payload(payload.as_ref());

        let delivery = producer.send(record, Timeout::After(ack_timeout));
        match tokio::time::timeout(ack_timeout, delivery).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err((e, _message))) => Err(ContractError::sink_write(
                SINK_NAME,
                format!("delivery to '{topic}' failed: {e}"),
            )),
            Err(_) => Err(ContractError::sink_write(
                SINK_NAME,
                format!("no acknowledgment from '{topic}' within {ack_timeout:?}"),
            )),
        }
    }

    async fn flush(&mut self, timeout: Duration) -> Result<(), ContractError> {
        let Some(producer) = self.producer.as_ref() else {
            return Ok(());
        };
        producer
            .flush(Timeout::After(timeout))
            .map_err(|e| ContractError::sink_write(SINK_NAME, format!("flush failed: {e}")))
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        if self.producer.take().is_some() {
            debug!("Kafka producer dropped");
        }
        Ok(())
    }
}
