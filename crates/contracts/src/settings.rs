//! RelaySettings - Config Loader output
//!
//! Describes the complete run configuration: dataset origin, row bound,
//! local data location and the option bundle of every sink kind.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use validator::{Validate, ValidationError};

use crate::{ContractError, SinkKind, DEFAULT_MAX_ROWS};

/// Complete run configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RelaySettings {
    /// Dataset URL (may be empty when the file is already present)
    #[serde(default)]
    #[validate(custom(function = "validate_dataset_url"))]
    pub dataset_url: String,

    /// Maximum number of records read from the dataset
    #[serde(default = "default_max_rows")]
    #[validate(range(min = 1))]
    pub max_rows: usize,

    /// Active sink identifier (parsed by the sink factory)
    #[serde(default = "default_output_strategy")]
    pub output_strategy: String,

    /// Directory holding the local dataset copy
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// File name of the local dataset copy
    #[serde(default = "default_dataset_file")]
    #[validate(length(min = 1))]
    pub dataset_file: String,

    /// Option bundle per sink kind
    #[serde(default)]
    #[validate(nested)]
    pub output_config: OutputConfig,
}

fn default_max_rows() -> usize {
    DEFAULT_MAX_ROWS
}

fn default_output_strategy() -> String {
    SinkKind::Console.to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_dataset_file() -> String {
    "fire_incidents.csv".to_string()
}

fn validate_dataset_url(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() || url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::new("dataset_url")
            .with_message("dataset_url must be empty or an http(s) URL".into()))
    }
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            dataset_url: String::new(),
            max_rows: default_max_rows(),
            output_strategy: default_output_strategy(),
            data_dir: default_data_dir(),
            dataset_file: default_dataset_file(),
            output_config: OutputConfig::default(),
        }
    }
}

impl RelaySettings {
    /// Local dataset path: `data_dir/dataset_file`
    pub fn dataset_path(&self) -> PathBuf {
        self.data_dir.join(&self.dataset_file)
    }

    /// Parse the configured sink identifier
    pub fn output_kind(&self) -> Result<SinkKind, ContractError> {
        SinkKind::from_str(&self.output_strategy)
    }
}

/// Option bundles, one per sink kind
///
/// Only the bundle of the active kind is used in a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct OutputConfig {
    #[serde(default)]
    #[validate(nested)]
    pub console: ConsoleSinkConfig,

    #[serde(default, alias = "kafka")]
    #[validate(nested)]
    pub queue: QueueSinkConfig,

    #[serde(default, alias = "redis")]
    #[validate(nested)]
    pub store: StoreSinkConfig,
}

/// Console sink options
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConsoleSinkConfig {
    /// Width of the dashed line printed after every record
    #[serde(default = "default_separator_width")]
    #[validate(range(min = 1))]
    pub separator_width: usize,
}

fn default_separator_width() -> usize {
    50
}

impl Default for ConsoleSinkConfig {
    fn default() -> Self {
        Self {
            separator_width: default_separator_width(),
        }
    }
}

/// Queue sink options (Kafka producer)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QueueSinkConfig {
    /// Comma separated broker list
    #[serde(default = "default_bootstrap_servers")]
    #[validate(length(min = 1))]
    pub bootstrap_servers: String,

    /// Target topic
    #[serde(default = "default_topic")]
    #[validate(length(min = 1))]
    pub topic: String,

    /// Per-message acknowledgment timeout (seconds)
    #[serde(default = "default_ack_timeout_secs")]
    #[validate(range(min = 1))]
    pub ack_timeout_secs: u64,

    /// Broker reachability check timeout at construction (seconds)
    #[serde(default = "default_connect_timeout_secs")]
    #[validate(range(min = 1))]
    pub connect_timeout_secs: u64,

    /// Emit a progress notice every N records
    #[serde(default = "default_interval")]
    #[validate(range(min = 1))]
    pub progress_interval: usize,
}

fn default_bootstrap_servers() -> String {
    "localhost:9092".to_string()
}

fn default_topic() -> String {
    "fire_incidents".to_string()
}

fn default_ack_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_interval() -> usize {
    100
}

impl Default for QueueSinkConfig {
    fn default() -> Self {
        Self {
            bootstrap_servers: default_bootstrap_servers(),
            topic: default_topic(),
            ack_timeout_secs: default_ack_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            progress_interval: default_interval(),
        }
    }
}

impl QueueSinkConfig {
    pub fn ack_timeout(&self) -> Duration {
        Duration::from_secs(self.ack_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Store sink options (Redis)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StoreSinkConfig {
    #[serde(default = "default_store_host")]
    #[validate(length(min = 1))]
    pub host: String,

    #[serde(default = "default_store_port")]
    pub port: u16,

    /// Database index
    #[serde(default)]
    pub db: u32,

    /// Prepended to every key
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Field whose value identifies a record; positional index otherwise
    #[serde(default = "default_id_field")]
    pub id_field: String,

    /// Pipelined writes per round trip
    #[serde(default = "default_interval")]
    #[validate(range(min = 1))]
    pub flush_every: usize,

    /// Connection + PING timeout at construction (seconds)
    #[serde(default = "default_connect_timeout_secs")]
    #[validate(range(min = 1))]
    pub connect_timeout_secs: u64,
}

fn default_store_host() -> String {
    "localhost".to_string()
}

fn default_store_port() -> u16 {
    6379
}

fn default_key_prefix() -> String {
    "fire_incident:".to_string()
}

fn default_id_field() -> String {
    "INCIDENT_DISPATCH_ID".to_string()
}

impl Default for StoreSinkConfig {
    fn default() -> Self {
        Self {
            host: default_store_host(),
            port: default_store_port(),
            db: 0,
            key_prefix: default_key_prefix(),
            id_field: default_id_field(),
            flush_every: default_interval(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl StoreSinkConfig {
    /// Connection URL understood by the store client
    pub fn connection_url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_document() {
        let settings: RelaySettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.max_rows, 100);
        assert_eq!(settings.output_strategy, "console");
        assert_eq!(settings.output_kind().unwrap(), SinkKind::Console);
        assert_eq!(settings.output_config.queue.ack_timeout_secs, 10);
        assert_eq!(settings.output_config.store.flush_every, 100);
        assert_eq!(
            settings.dataset_path(),
            PathBuf::from("data").join("fire_incidents.csv")
        );
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_legacy_bundle_names() {
        let doc = r#"{
            "output_strategy": "redis",
            "output_config": {
                "kafka": { "bootstrap_servers": "broker:9092", "topic": "incidents" },
                "redis": { "host": "cache", "port": 6380, "db": 2, "key_prefix": "fi:" }
            }
        }"#;
        let settings: RelaySettings = serde_json::from_str(doc).unwrap();
        assert_eq!(settings.output_kind().unwrap(), SinkKind::Store);
        assert_eq!(settings.output_config.queue.topic, "incidents");
        assert_eq!(
            settings.output_config.store.connection_url(),
            "redis://cache:6380/2"
        );
        assert_eq!(settings.output_config.store.key_prefix, "fi:");
    }

    #[test]
    fn test_invalid_dataset_url() {
        let settings = RelaySettings {
            dataset_url: "ftp://example.org/data.csv".into(),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_flush_every_rejected() {
        let mut settings = RelaySettings::default();
        settings.output_config.store.flush_every = 0;
        assert!(settings.validate().is_err());
    }
}
