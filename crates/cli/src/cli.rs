//! CLI argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::pipeline::RelayOptions;

/// CSV Relay - download a CSV dataset and dispatch its records to one sink
#[derive(Parser, Debug)]
#[command(
    name = "csv-relay",
    author,
    version,
    about = "Download a CSV dataset and dispatch its records to a console, Kafka or Redis sink",
    long_about = "Downloads the configured CSV dataset once, parses a bounded number of rows,\n\
                  and hands them to exactly one output sink selected by configuration \n\
                  or by --strategy."
)]
pub struct Cli {
    /// Path to configuration file (JSON or TOML)
    #[arg(
        short,
        long,
        default_value = "config/settings.json",
        env = "CSV_RELAY_CONFIG"
    )]
    pub config: PathBuf,

    /// Output sink, overriding the configured one (console, queue/kafka, store/redis)
    #[arg(short, long, env = "CSV_RELAY_STRATEGY")]
    pub strategy: Option<String>,

    /// Make sure the dataset is present and readable, then exit without dispatch
    #[arg(long)]
    pub download_only: bool,

    /// Override the data directory from configuration
    #[arg(long, env = "CSV_RELAY_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, env = "CSV_RELAY_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty", env = "CSV_RELAY_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "CSV_RELAY_METRICS_PORT")]
    pub metrics_port: u16,
}

impl Cli {
    /// Options for the relay pipeline
    pub fn relay_options(&self) -> RelayOptions {
        RelayOptions {
            config_path: self.config.clone(),
            strategy: self.strategy.clone(),
            download_only: self.download_only,
            data_dir: self.data_dir.clone(),
        }
    }

    /// Default log level when RUST_LOG is unset
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    pub fn metrics_port(&self) -> Option<u16> {
        (self.metrics_port != 0).then_some(self.metrics_port)
    }
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["csv-relay"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("config/settings.json"));
        assert!(cli.strategy.is_none());
        assert!(!cli.download_only);
        assert_eq!(cli.metrics_port(), None);
        assert_eq!(cli.log_level(), "info");
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "csv-relay",
            "--config",
            "other.toml",
            "--strategy",
            "redis",
            "--download-only",
            "--data-dir",
            "/tmp/relay",
            "-vv",
            "--metrics-port",
            "9100",
        ])
        .unwrap();

        let options = cli.relay_options();
        assert_eq!(options.config_path, PathBuf::from("other.toml"));
        assert_eq!(options.strategy.as_deref(), Some("redis"));
        assert!(options.download_only);
        assert_eq!(options.data_dir, Some(PathBuf::from("/tmp/relay")));
        assert_eq!(cli.log_level(), "trace");
        assert_eq!(cli.metrics_port(), Some(9100));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["csv-relay", "-q", "-v"]).is_err());
        let cli = Cli::try_parse_from(["csv-relay", "-q"]).unwrap();
        assert_eq!(cli.log_level(), "error");
    }
}
