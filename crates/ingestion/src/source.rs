//! RecordSource - ensures the dataset is present, then loads a bounded batch

use contracts::{Batch, RelaySettings};
use tracing::{info, instrument};

use crate::download::Downloader;
use crate::error::{IngestionError, Result};
use crate::location::DatasetLocation;
use crate::reader::CsvRecordReader;

/// Outcome of [`RecordSource::ensure_dataset`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetStatus {
    /// Local copy existed, no network access happened
    AlreadyPresent,
    /// Local copy was fetched in this run
    Downloaded { bytes: u64 },
}

/// Record Source
///
/// Downloads the dataset once if absent, then reads it on every run.
pub struct RecordSource {
    url: String,
    location: DatasetLocation,
    reader: CsvRecordReader,
}

impl RecordSource {
    pub fn new(url: impl Into<String>, location: DatasetLocation, max_rows: usize) -> Self {
        Self {
            url: url.into(),
            location,
            reader: CsvRecordReader::new(max_rows),
        }
    }

    /// Build from loaded settings
    pub fn from_settings(settings: &RelaySettings) -> Self {
        Self::new(
            &settings.dataset_url,
            DatasetLocation::from_settings(settings),
            settings.max_rows,
        )
    }

    pub fn location(&self) -> &DatasetLocation {
        &self.location
    }

    /// Make sure the local dataset file exists
    ///
    /// # Errors
    /// - No URL configured while the file is absent
    /// - Download failure
    #[instrument(name = "record_source_ensure", skip(self), fields(path = %self.location.path().display()))]
    pub async fn ensure_dataset(&self) -> Result<DatasetStatus> {
        let path = self.location.path();
        if self.location.exists() {
            info!("Dataset already present, skipping download");
            return Ok(DatasetStatus::AlreadyPresent);
        }

        if self.url.is_empty() {
            return Err(IngestionError::MissingUrl {
                path: path.display().to_string(),
            });
        }

        info!(url = %self.url, "Dataset not found locally, downloading");
        let bytes = Downloader::new()?.download(&self.url, &path).await?;
        Ok(DatasetStatus::Downloaded { bytes })
    }

    /// Read the bounded batch from the local file
    pub fn load(&self) -> Result<Batch> {
        let batch = self.reader.read(&self.location.path())?;
        info!(
            rows = batch.len(),
            path = %self.location.path().display(),
            "Records loaded"
        );
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::test_server;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_present_file_skips_download() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("data.csv"), "id\n1\n2\n").unwrap();

        // Unroutable URL: any download attempt would fail the test
        let source = RecordSource::new(
            "http://127.0.0.1:9/never",
            DatasetLocation::new(dir.path(), "data.csv"),
            10,
        );

        assert_eq!(
            source.ensure_dataset().await.unwrap(),
            DatasetStatus::AlreadyPresent
        );
        assert_eq!(source.load().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_absent_file_is_downloaded() {
        let url = test_server::serve_once("200 OK", "id\n1\n").await;
        let dir = tempdir().unwrap();
        let source = RecordSource::new(url, DatasetLocation::new(dir.path().join("data"), "d.csv"), 10);

        let status = source.ensure_dataset().await.unwrap();
        assert_eq!(status, DatasetStatus::Downloaded { bytes: 5 });
        assert!(source.location().exists());
    }

    #[tokio::test]
    async fn test_absent_file_without_url() {
        let dir = tempdir().unwrap();
        let source = RecordSource::new("", DatasetLocation::new(dir.path(), "d.csv"), 10);

        let err = source.ensure_dataset().await.unwrap_err();
        assert!(matches!(err, IngestionError::MissingUrl { .. }));
    }
}
