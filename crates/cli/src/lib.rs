//! # CSV Relay CLI
//!
//! `csv-relay` 的参数解析与运行编排。
//!
//! 提供：
//! - 配置加载、命令行覆盖
//! - 数据集准备（下载 + 解析）
//! - 构建唯一的 sink 并分发记录

#![recursion_limit = "256"]

pub mod cli;
pub mod commands;
pub mod error;
pub mod pipeline;

pub use cli::Cli;
pub use error::CliError;
pub use pipeline::{RelayOptions, RelayPipeline, RelayStats};
