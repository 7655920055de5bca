//! # Ingestion
//!
//! Record Source module.
//!
//! Responsibilities:
//! - Download the dataset once when no local copy exists
//! - Parse at most `max_rows` CSV rows into a `Batch`
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::RecordSource;
//!
//! let source = RecordSource::from_settings(&settings);
//! source.ensure_dataset().await?;
//! let batch = source.load()?;
//! ```

mod download;
mod error;
mod location;
mod reader;
mod source;

// Re-exports
pub use contracts::{Batch, Record};
pub use download::Downloader;
pub use error::{IngestionError, Result};
pub use location::DatasetLocation;
pub use reader::CsvRecordReader;
pub use source::{DatasetStatus, RecordSource};
