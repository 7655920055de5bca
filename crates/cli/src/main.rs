//! # CSV Relay
//!
//! 命令行接口入口点。
//!
//! 任何错误都以退出码 1 结束进程。

#![recursion_limit = "256"]

use anyhow::Result;
use clap::Parser;
use tracing::info;

use csv_relay_cli::Cli;
use csv_relay_cli::commands::run_relay;
use observability::ObservabilityConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    observability::init_with_config(ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: cli.metrics_port(),
        default_log_level: cli.log_level().to_string(),
    })?;

    info!(version = env!("CARGO_PKG_VERSION"), "CSV Relay starting");

    let result = run_relay(&cli).await;

    if let Err(ref e) = result {
        tracing::error!(error = %format!("{e:#}"), "Command failed");
    }

    result
}
