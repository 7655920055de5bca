//! # Observability
//!
//! 可观测性模块：Tracing + Prometheus 指标。
//!
//! ## 功能
//!
//! - Tracing 初始化 (JSON/Pretty/Compact 格式)
//! - Prometheus 指标导出
//! - 运行级指标（记录加载数、分发结果、运行耗时）
//!
//! ## 使用示例
//!
//! ```ignore
//! use observability::{init_with_config, ObservabilityConfig};
//!
//! // 初始化
//! init_with_config(ObservabilityConfig::default())?;
//!
//! // 记录分发结果
//! observability::record_run_completed("console", true, elapsed);
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

// Re-exports
pub use crate::metrics::{record_dispatch_report, record_records_loaded, record_run_completed};

/// 可观测性配置
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// 日志格式
    pub log_format: LogFormat,
    /// Prometheus 端口 (None = 禁用)
    pub metrics_port: Option<u16>,
    /// 默认日志级别
    pub default_log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            metrics_port: None,
            default_log_level: "info".to_string(),
        }
    }
}

/// 日志格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON 结构化日志
    Json,
    /// 人类可读格式
    #[default]
    Pretty,
    /// 紧凑单行格式
    Compact,
}

/// 初始化可观测性（Tracing + Prometheus）
///
/// - Tracing: 支持 RUST_LOG 环境变量，未设置时使用 `default_log_level`
/// - Prometheus: `metrics_port` 为 None 时禁用
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    // 1. Initialize Tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_log_level));

    let fmt_layer = match config.log_format {
        LogFormat::Json => fmt::layer()
            .with_writer(std::io::stderr)
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().with_writer(std::io::stderr).pretty().boxed(),
        LogFormat::Compact => fmt::layer().with_writer(std::io::stderr).compact().boxed(),
    };

    // 日志写到 stderr，stdout 留给 console sink
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    // 2. Initialize Prometheus Exporter (if enabled)
    if let Some(port) = config.metrics_port {
        let builder = PrometheusBuilder::new();
        builder
            .with_http_listener(([0, 0, 0, 0], port))
            .install()
            .context("Failed to install Prometheus recorder")?;

        tracing::info!(port = port, "Prometheus metrics endpoint initialized");
    }

    tracing::info!(
        log_format = ?config.log_format,
        metrics_port = ?config.metrics_port,
        "Observability initialized"
    );

    Ok(())
}
