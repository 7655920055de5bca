//! Default command: relay the dataset to the selected sink.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::Cli;
use crate::pipeline::RelayPipeline;

/// Execute one relay run
pub async fn run_relay(cli: &Cli) -> Result<()> {
    info!(config = %cli.config.display(), "Loading configuration");

    let pipeline = RelayPipeline::new(cli.relay_options());
    let stats = pipeline.run().await.context("Relay run failed")?;

    match &stats.report {
        Some(report) => {
            if !report.is_complete() {
                warn!(
                    failed = report.failed,
                    attempted = report.attempted,
                    "Some records were not delivered"
                );
            }
            info!(
                sink = stats.sink.as_deref().unwrap_or_default(),
                delivered = report.delivered,
                duration_secs = stats.duration.as_secs_f64(),
                "Relay completed successfully"
            );
        }
        None => info!(
            records = stats.records_loaded,
            "Dataset ready, download-only run finished"
        ),
    }

    if !cli.quiet {
        stats.print_summary();
    }
    Ok(())
}
