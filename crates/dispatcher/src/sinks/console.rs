//! ConsoleSink - prints records as readable text

use std::io::{self, Stdout, Write};

use contracts::{Batch, ConsoleSinkConfig, ContractError, EmitReport, RecordSink, Record};
use tracing::{debug, instrument};

const SINK_NAME: &str = "console";

/// Sink that prints every record to a writer (stdout by default)
pub struct ConsoleSink<W: Write + Send = Stdout> {
    writer: W,
    separator: String,
    emitted: bool,
}

impl ConsoleSink<Stdout> {
    /// Create a ConsoleSink writing to standard output
    pub fn new(config: &ConsoleSinkConfig) -> Self {
        Self::with_writer(io::stdout(), config)
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    /// Create a ConsoleSink writing to an arbitrary writer
    pub fn with_writer(writer: W, config: &ConsoleSinkConfig) -> Self {
        Self {
            writer,
            separator: "-".repeat(config.separator_width),
            emitted: false,
        }
    }

    /// Take the writer back (tests inspect what was printed)
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn write_record(&mut self, position: usize, record: &Record) -> io::Result<()> {
        writeln!(self.writer, "Record #{position}:")?;
        for (field, value) in record.iter() {
            writeln!(self.writer, "  {field}: {value}")?;
        }
        writeln!(self.writer, "{}", self.separator)
    }

    fn write_batch(&mut self, batch: &Batch) -> io::Result<usize> {
        writeln!(self.writer, "\n=== Console output ===\n")?;
        for (index, record) in batch.iter().enumerate() {
            self.write_record(index + 1, record)?;
        }
        self.writer.flush()?;
        Ok(batch.len())
    }
}

impl<W: Write + Send> RecordSink for ConsoleSink<W> {
    fn name(&self) -> &str {
        SINK_NAME
    }

    #[instrument(name = "console_sink_emit", skip(self, batch), fields(records = batch.len()))]
    async fn emit(&mut self, batch: &Batch) -> Result<EmitReport, ContractError> {
        if std::mem::replace(&mut self.emitted, true) {
            return Err(ContractError::AlreadyEmitted {
                sink_name: SINK_NAME.to_string(),
            });
        }

        let written = self
            .write_batch(batch)
            .map_err(|e| ContractError::sink_write(SINK_NAME, format!("output closed: {e}")))?;

        debug!(written, "Batch printed");
        Ok(EmitReport {
            attempted: batch.len(),
            delivered: written,
            ..EmitReport::default()
        })
    }

    async fn release(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::FieldValue;

    fn sample_batch() -> Batch {
        Batch::new(vec![
            Record::new().with_field("id", 7i64).with_field("city", "Oakland"),
            Record::new().with_field("id", 8i64).with_field("city", FieldValue::Null),
        ])
    }

    fn printed(sink: ConsoleSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_writer()).unwrap()
    }

    #[tokio::test]
    async fn test_console_sink_prints_records_in_order() {
        let config = ConsoleSinkConfig { separator_width: 5 };
        let mut sink = ConsoleSink::with_writer(Vec::new(), &config);

        let report = sink.emit(&sample_batch()).await.unwrap();
        assert_eq!(report.attempted, 2);
        assert_eq!(report.delivered, 2);
        assert!(report.is_complete());

        let output = printed(sink);
        let expected = "\n=== Console output ===\n\n\
                        Record #1:\n  id: 7\n  city: Oakland\n-----\n\
                        Record #2:\n  id: 8\n  city: null\n-----\n";
        assert_eq!(output, expected);
    }

    #[tokio::test]
    async fn test_console_sink_prints_source_text() {
        let config = ConsoleSinkConfig { separator_width: 1 };
        let mut sink = ConsoleSink::with_writer(Vec::new(), &config);
        let batch = Batch::new(vec![Record::new()
            .with_field("units", FieldValue::parse("1.0"))
            .with_field("id", FieldValue::parse("12345678901234567890"))]);

        sink.emit(&batch).await.unwrap();
        let output = printed(sink);
        assert!(output.contains("  units: 1.0\n"));
        assert!(output.contains("  id: 12345678901234567890\n"));
    }

    #[tokio::test]
    async fn test_console_sink_empty_batch() {
        let mut sink = ConsoleSink::with_writer(Vec::new(), &ConsoleSinkConfig::default());
        let report = sink.emit(&Batch::default()).await.unwrap();
        assert_eq!(report, EmitReport::default());
        assert!(!printed(sink).contains("Record #"));
    }

    #[tokio::test]
    async fn test_console_sink_second_emit_rejected() {
        let mut sink = ConsoleSink::with_writer(Vec::new(), &ConsoleSinkConfig::default());
        sink.emit(&sample_batch()).await.unwrap();

        let err = sink.emit(&sample_batch()).await.unwrap_err();
        assert!(matches!(err, ContractError::AlreadyEmitted { .. }));
        assert_eq!(printed(sink).matches("Record #1:").count(), 1);
    }

    #[tokio::test]
    async fn test_console_sink_release_is_noop() {
        let mut sink = ConsoleSink::with_writer(Vec::new(), &ConsoleSinkConfig::default());
        sink.release().await;
        sink.release().await;
        assert_eq!(sink.name(), "console");
        assert!(printed(sink).is_empty());
    }
}
