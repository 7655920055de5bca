//! Bounded CSV reader

use std::path::Path;

use contracts::{Batch, FieldValue, Record};
use metrics::counter;
use tracing::{debug, instrument};

use crate::error::{IngestionError, Result};

/// Reads at most `max_rows` records from a CSV file with a header row
#[derive(Debug, Clone, Copy)]
pub struct CsvRecordReader {
    max_rows: usize,
}

impl CsvRecordReader {
    pub fn new(max_rows: usize) -> Self {
        Self { max_rows }
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    /// Read the file into a batch
    ///
    /// Header cells become field names, in column order. Rows whose length
    /// differs from the header are parse errors.
    #[instrument(name = "csv_read", skip(self, path), fields(path = %path.display(), max_rows = self.max_rows))]
    pub fn read(&self, path: &Path) -> Result<Batch> {
        let parse_err = |e: csv::Error| IngestionError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(parse_err)?;

        let headers = reader.headers().map_err(parse_err)?.clone();

        let mut records = Vec::with_capacity(self.max_rows.min(1024));
        for row in reader.records().take(self.max_rows) {
            let row = row.map_err(parse_err)?;
            let record: Record = headers
                .iter()
                .zip(row.iter())
                .map(|(name, cell)| (name, FieldValue::parse(cell)))
                .collect();
            records.push(record);
        }

        counter!("csv_relay_rows_read_total").increment(records.len() as u64);
        debug!(rows = records.len(), columns = headers.len(), "CSV loaded");

        Ok(Batch::new(records))
    }
}
