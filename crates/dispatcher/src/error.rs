//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Sink creation error
    #[error("failed to create sink '{name}': {source}")]
    SinkCreation {
        name: String,
        #[source]
        source: contracts::ContractError,
    },

    /// Sink emission error (from contract)
    #[error("sink error: {0}")]
    Contract(#[from] contracts::ContractError),
}

impl DispatcherError {
    /// Create a sink creation error
    pub fn sink_creation(name: impl Into<String>, source: contracts::ContractError) -> Self {
        Self::SinkCreation {
            name: name.into(),
            source,
        }
    }

    /// Whether the underlying failure is configuration-class (unknown sink, bad options)
    pub fn is_config_error(&self) -> bool {
        match self {
            Self::SinkCreation { source, .. } | Self::Contract(source) => source.is_config_error(),
        }
    }
}
