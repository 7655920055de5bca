//! Ingestion error types

use thiserror::Error;

/// Ingestion error
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Dataset absent locally and no URL to fetch it from
    #[error("dataset '{path}' not found and no dataset_url is configured")]
    MissingUrl {
        /// Expected local path
        path: String,
    },

    /// Network / HTTP failure while fetching the dataset
    #[error("failed to download '{url}': {message}")]
    Download {
        /// Source URL
        url: String,
        /// Error message
        message: String,
    },

    /// Malformed CSV or unreadable local file
    #[error("failed to parse dataset '{path}': {message}")]
    Parse {
        /// Local path
        path: String,
        /// Error message
        message: String,
    },

    /// Local filesystem failure
    #[error("io error on '{path}': {source}")]
    Io {
        /// Path involved
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl IngestionError {
    pub(crate) fn download(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Download {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Ingestion Result type alias
pub type Result<T> = std::result::Result<T, IngestionError>;
