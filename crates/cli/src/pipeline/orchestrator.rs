//! Pipeline orchestrator - configuration, dataset, then exactly one sink.

use std::future::Future;
use std::path::PathBuf;
use std::time::Instant;

use config_loader::ConfigLoader;
use contracts::{OutputConfig, RecordSink, RelaySettings};
use dispatcher::{Dispatcher, DispatcherError, create_dispatcher};
use ingestion::RecordSource;
use tracing::{info, instrument};

use super::RelayStats;
use crate::error::{CliError, Result};

/// Per-run options coming from the command line
#[derive(Debug, Clone, Default)]
pub struct RelayOptions {
    /// Configuration document location
    pub config_path: PathBuf,

    /// Sink identifier overriding `output_strategy`
    pub strategy: Option<String>,

    /// Stop once the dataset is present and readable
    pub download_only: bool,

    /// Directory overriding `data_dir`
    pub data_dir: Option<PathBuf>,
}

/// Main relay orchestrator
pub struct RelayPipeline {
    options: RelayOptions,
}

impl RelayPipeline {
    /// Create a new pipeline with the given options
    pub fn new(options: RelayOptions) -> Self {
        Self { options }
    }

    /// Load, validate and apply command-line overrides
    ///
    /// A missing configuration file fails before anything else happens; an
    /// unknown sink identifier fails right after parsing.
    #[instrument(name = "relay_load_settings", skip(self), fields(config = %self.options.config_path.display()))]
    pub fn load_settings(&self) -> Result<RelaySettings> {
        let path = &self.options.config_path;
        if !path.exists() {
            return Err(CliError::config_not_found(path));
        }

        let mut settings =
            ConfigLoader::load_from_path(path).map_err(|e| CliError::config(path, e))?;

        if let Some(strategy) = &self.options.strategy {
            info!(strategy = %strategy, "Overriding output strategy from CLI");
            settings.output_strategy = strategy.clone();
        }
        if let Some(data_dir) = &self.options.data_dir {
            info!(data_dir = %data_dir.display(), "Overriding data directory from CLI");
            settings.data_dir = data_dir.clone();
        }

        // Unknown sink identifiers fail here, before any download or parse
        settings.output_kind().map_err(|e| CliError::config(path, e))?;

        info!(
            strategy = %settings.output_strategy,
            max_rows = settings.max_rows,
            dataset = %settings.dataset_path().display(),
            "Configuration loaded"
        );
        Ok(settings)
    }

    /// Run the relay with the sink named in configuration
    pub async fn run(self) -> Result<RelayStats> {
        self.run_with(|identifier, output| async move {
            create_dispatcher(&identifier, &output).await
        })
        .await
    }

    /// Run the relay, building the dispatcher with `build`
    ///
    /// `build` receives the effective sink identifier and output options and
    /// is only called after the batch was loaded.
    pub async fn run_with<S, F, Fut>(self, build: F) -> Result<RelayStats>
    where
        S: RecordSink,
        F: FnOnce(String, OutputConfig) -> Fut,
        Fut: Future<Output = std::result::Result<Dispatcher<S>, DispatcherError>>,
    {
        let started = Instant::now();
        let settings = self.load_settings()?;

        let source = RecordSource::from_settings(&settings);
        let dataset = source.ensure_dataset().await?;
        let batch = source.load()?;
        observability::record_records_loaded(batch.len());

        let mut stats = RelayStats::new(dataset, batch.len());

        if self.options.download_only {
            info!("Download-only mode, dataset ready, skipping dispatch");
            stats.duration = started.elapsed();
            return Ok(stats);
        }

        let dispatcher = build(settings.output_strategy, settings.output_config).await?;
        let sink_name = dispatcher.sink_name().to_string();
        let sink_metrics = dispatcher.metrics();

        let result = dispatcher.run(&batch).await;
        observability::record_run_completed(&sink_name, result.is_ok(), started.elapsed());
        let report = result?;
        observability::record_dispatch_report(&sink_name, &report);

        stats.sink = Some(sink_name);
        stats.report = Some(report);
        stats.sink_metrics = Some(sink_metrics.snapshot());
        stats.duration = started.elapsed();
        Ok(stats)
    }
}
