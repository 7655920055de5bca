//! StoreSink - writes one key per record through a pipelined client

use contracts::{Batch, ContractError, EmitReport, Record, RecordSink, StoreSinkConfig};
use tracing::{debug, info, instrument, warn};

use crate::transport::{KeyValueClient, RedisClient};

const SINK_NAME: &str = "store";

/// Key under which a record is stored
///
/// `prefix` followed by the record's `id_field` value, or by the zero-based
/// `index` when that field is absent or null.
pub fn derive_key(record: &Record, index: usize, prefix: &str, id_field: &str) -> String {
    match record.get(id_field) {
        Some(value) if !value.is_null() => format!("{prefix}{value}"),
        _ => format!("{prefix}{index}"),
    }
}

/// Sink that stores every record as a JSON string value
pub struct StoreSink<C: KeyValueClient = RedisClient> {
    client: C,
    config: StoreSinkConfig,
    emitted: bool,
    released: bool,
}

impl StoreSink<RedisClient> {
    /// Connect to the configured store
    ///
    /// # Errors
    /// `ContractError::SinkConnection` when the store is unreachable
    #[instrument(
        name = "store_sink_connect",
        skip(config),
        fields(host = %config.host, port = config.port, db = config.db)
    )]
    pub async fn connect(config: &StoreSinkConfig) -> Result<Self, ContractError> {
        let client = RedisClient::connect(config).await?;
        Ok(Self::with_client(client, config.clone()))
    }
}

impl<C: KeyValueClient> StoreSink<C> {
    /// Create a StoreSink over an already connected client
    pub fn with_client(client: C, config: StoreSinkConfig) -> Self {
        Self {
            client,
            config,
            emitted: false,
            released: false,
        }
    }

    async fn flush_pending(&mut self, report: &mut EmitReport) {
        let pending = self.client.pending();
        if pending == 0 {
            return;
        }

        report.flushes += 1;
        match self.client.flush().await {
            Ok(sent) => {
                report.delivered += sent;
                debug!(sent, "Pipeline flushed");
            }
            Err(e) => {
                warn!(lost = pending, error = %e, "Pipeline flush failed");
                report.failed += pending;
            }
        }
    }
}

impl<C: KeyValueClient> RecordSink for StoreSink<C> {
    fn name(&self) -> &str {
        SINK_NAME
    }

    #[instrument(
        name = "store_sink_emit",
        skip(self, batch),
        fields(host = %self.config.host, db = self.config.db, records = batch.len())
    )]
    async fn emit(&mut self, batch: &Batch) -> Result<EmitReport, ContractError> {
        if std::mem::replace(&mut self.emitted, true) {
            return Err(ContractError::AlreadyEmitted {
                sink_name: SINK_NAME.to_string(),
            });
        }

        info!(
            host = %self.config.host,
            port = self.config.port,
            db = self.config.db,
            "Storing records"
        );

        let mut report = EmitReport::default();

        for (index, record) in batch.iter().enumerate() {
            report.attempted += 1;

            let key = derive_key(record, index, &self.config.key_prefix, &self.config.id_field);
            let queued = record
                .to_json()
                .map_err(|e| ContractError::sink_write(SINK_NAME, e.to_string()))
                .and_then(|value| self.client.queue_set(&key, &value));

            if let Err(e) = queued {
                warn!(index, %key, error = %e, "Record write failed, skipping");
                report.failed += 1;
            }

            if (index + 1) % self.config.flush_every == 0 {
                self.flush_pending(&mut report).await;
                info!(stored = index + 1, "Store progress");
            }
        }
        self.flush_pending(&mut report).await;

        info!(
            attempted = report.attempted,
            delivered = report.delivered,
            failed = report.failed,
            flushes = report.flushes,
            "Storing finished"
        );
        Ok(report)
    }

    #[instrument(name = "store_sink_release", skip(self))]
    async fn release(&mut self) {
        if std::mem::replace(&mut self.released, true) {
            return;
        }

        let pending = self.client.pending();
        if pending > 0 {
            if let Err(e) = self.client.flush().await {
                warn!(lost = pending, error = %e, "Flush on release failed");
            }
        }
        match self.client.close().await {
            Ok(()) => info!("Store connection closed"),
            Err(e) => warn!(error = %e, "Closing store connection failed"),
        }
    }
}
