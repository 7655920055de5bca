//! 运行级指标
//!
//! 每次运行结束时记录一次；逐条记录的计数由 ingestion 与 dispatcher 各自上报。

use std::time::Duration;

use contracts::EmitReport;
use metrics::{counter, gauge, histogram};

/// 记录本次运行加载的记录数
pub fn record_records_loaded(count: usize) {
    gauge!("csv_relay_batch_records").set(count as f64);
}

/// 记录一次 emit 的结果
///
/// 按 sink 标签累计尝试、成功、失败数量。
pub fn record_dispatch_report(sink_name: &str, report: &EmitReport) {
    counter!("csv_relay_records_attempted_total", "sink" => sink_name.to_string())
        .increment(report.attempted as u64);

    let rate = if report.attempted > 0 {
        report.delivered as f64 / report.attempted as f64
    } else {
        1.0
    };
    gauge!("csv_relay_delivery_ratio", "sink" => sink_name.to_string()).set(rate);
}

/// 记录运行结束状态与耗时
pub fn record_run_completed(sink_name: &str, success: bool, elapsed: Duration) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "csv_relay_runs_total",
        "sink" => sink_name.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!("csv_relay_run_duration_ms", "sink" => sink_name.to_string())
        .record(elapsed.as_secs_f64() * 1000.0);
}
