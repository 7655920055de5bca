//! Layered error definitions
//!
//! Categorized by source: config / sink

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    /// Sink identifier outside the known set
    #[error("unknown sink type: '{0}' (expected one of: console, queue, store)")]
    UnknownSinkType(String),

    // ===== Sink Errors =====
    /// Sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    /// Sink connection error
    #[error("sink '{sink_name}' connection error: {message}")]
    SinkConnection { sink_name: String, message: String },

    /// Emit called twice on the same sink instance
    #[error("sink '{sink_name}' already emitted its batch")]
    AlreadyEmitted { sink_name: String },

    // ===== General Errors =====
    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Create sink connection error
    pub fn sink_connection(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkConnection {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Whether this error belongs to the configuration class
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigParse { .. } | Self::ConfigValidation { .. } | Self::UnknownSinkType(_)
        )
    }
}
