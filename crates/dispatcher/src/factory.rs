//! Sink factory - identifier to connected sink

use std::str::FromStr;

use contracts::{Batch, ContractError, EmitReport, OutputConfig, RecordSink, SinkKind};
use tracing::{info, instrument};

use crate::sinks::{ConsoleSink, QueueSink, StoreSink};

/// Every sink the relay can build
///
/// Callers only use it through `RecordSink`.
pub enum Sink {
    Console(ConsoleSink),
    Queue(QueueSink),
    Store(StoreSink),
}

impl Sink {
    pub fn kind(&self) -> SinkKind {
        match self {
            Self::Console(_) => SinkKind::Console,
            Self::Queue(_) => SinkKind::Queue,
            Self::Store(_) => SinkKind::Store,
        }
    }
}

impl RecordSink for Sink {
    fn name(&self) -> &str {
        match self {
            Self::Console(sink) => sink.name(),
            Self::Queue(sink) => sink.name(),
            Self::Store(sink) => sink.name(),
        }
    }

    async fn emit(&mut self, batch: &Batch) -> Result<EmitReport, ContractError> {
        match self {
            Self::Console(sink) => sink.emit(batch).await,
            Self::Queue(sink) => sink.emit(batch).await,
            Self::Store(sink) => sink.emit(batch).await,
        }
    }

    async fn release(&mut self) {
        match self {
            Self::Console(sink) => sink.release().await,
            Self::Queue(sink) => sink.release().await,
            Self::Store(sink) => sink.release().await,
        }
    }
}

/// Builds sinks from an identifier and the typed output options
pub struct SinkFactory;

impl SinkFactory {
    /// Parse `identifier` and build the matching sink
    ///
    /// # Errors
    /// - `ContractError::UnknownSinkType` for an unrecognised identifier
    /// - `ContractError::SinkConnection` when the target is unreachable
    pub async fn create(identifier: &str, output: &OutputConfig) -> Result<Sink, ContractError> {
        let kind = SinkKind::from_str(identifier)?;
        Self::create_kind(kind, output).await
    }

    /// Build the sink for an already parsed kind
    #[instrument(name = "sink_factory_create", skip(output), fields(sink = %kind))]
    pub async fn create_kind(kind: SinkKind, output: &OutputConfig) -> Result<Sink, ContractError> {
        let sink = match kind {
            SinkKind::Console => Sink::Console(ConsoleSink::new(&output.console)),
            SinkKind::Queue => Sink::Queue(QueueSink::connect(&output.queue).await?),
            SinkKind::Store => Sink::Store(StoreSink::connect(&output.store).await?),
        };
        info!(sink = %kind, "Sink ready");
        Ok(sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_factory_creates_console() {
        let sink = SinkFactory::create("console", &OutputConfig::default())
            .await
            .unwrap();
        assert_eq!(sink.kind(), SinkKind::Console);
        assert_eq!(sink.name(), "console");
    }

    #[tokio::test]
    async fn test_factory_rejects_unknown_identifier() {
        let result = SinkFactory::create("carrier_pigeon", &OutputConfig::default()).await;
        match result {
            Err(ContractError::UnknownSinkType(name)) => assert_eq!(name, "carrier_pigeon"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("unknown identifier accepted"),
        }
    }

    #[tokio::test]
    async fn test_factory_store_unreachable() {
        let mut output = OutputConfig::default();
        output.store.host = "127.0.0.1".to_string();
        output.store.port = 1;
        output.store.connect_timeout_secs = 1;

        let result = SinkFactory::create("redis", &output).await;
        assert!(matches!(result, Err(ContractError::SinkConnection { .. })));
    }

    #[tokio::test]
    async fn test_factory_queue_unreachable() {
        let mut output = OutputConfig::default();
        output.queue.bootstrap_servers = "127.0.0.1:1".to_string();
        output.queue.connect_timeout_secs = 1;

        let result = SinkFactory::create("kafka", &output).await;
        assert!(matches!(result, Err(ContractError::SinkConnection { .. })));
    }
}
