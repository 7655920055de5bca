//! Error types for CLI operations.

use std::path::PathBuf;

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// Configuration parsing or validation error
    #[error("Failed to load configuration from {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: contracts::ContractError,
    },

    /// Dataset download or parse error
    #[error("Dataset unavailable: {0}")]
    Dataset(#[from] ingestion::IngestionError),

    /// Sink creation or dispatch error
    #[error("Dispatch failed: {0}")]
    Dispatch(#[from] dispatcher::DispatcherError),
}

impl CliError {
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn config(path: impl Into<PathBuf>, source: contracts::ContractError) -> Self {
        Self::Config {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
