//! SinkKind - sink identifier
//!
//! Exactly one sink kind is active per run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ContractError;

/// Sink identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    /// Print records to standard output
    #[default]
    Console,
    /// Publish one message per record to a broker topic (Kafka)
    #[serde(alias = "kafka")]
    Queue,
    /// Write one key per record into a key-value store (Redis)
    #[serde(alias = "redis")]
    Store,
}

impl SinkKind {
    /// All known kinds
    pub const ALL: [SinkKind; 3] = [SinkKind::Console, SinkKind::Queue, SinkKind::Store];

    /// Canonical identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::Queue => "queue",
            Self::Store => "store",
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SinkKind {
    type Err = ContractError;

    /// Parse an identifier; `kafka` and `redis` are accepted as aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "console" => Ok(Self::Console),
            "queue" | "kafka" => Ok(Self::Queue),
            "store" | "redis" => Ok(Self::Store),
            _ => Err(ContractError::UnknownSinkType(s.to_string())),
        }
    }
}
