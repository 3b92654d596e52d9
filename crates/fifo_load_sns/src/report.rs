//! Console text printed around a run.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use fifo_load_core::{EngineSettings, TestResult};

use crate::config::LoadTestConfig;

pub fn render_preamble(
    config: &LoadTestConfig,
    settings: &EngineSettings,
    cpu_cores: usize,
    started_at: DateTime<Utc>,
) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "Topic ARN: {}", config.topic_arn);
    let _ = writeln!(text, "Region: {}", config.region);
    let _ = writeln!(text, "Messages: {}", settings.num_messages);
    let _ = writeln!(text, "Workers: {}", settings.worker_count);
    let _ = writeln!(text, "Admission limit: {}", settings.admission_limit);
    let _ = writeln!(text, "CPU Cores: {cpu_cores}");
    let _ = writeln!(
        text,
        "Sharding: {} shards (using CustomerID as shard key)",
        settings.shard_count
    );
    let _ = write!(text, "Started: {}", started_at.to_rfc3339());
    text
}

/// `admission_limit` is the reference point for the efficiency figure.
pub fn render_summary(result: &TestResult, admission_limit: usize) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "PERFORMANCE RESULTS:");
    let _ = writeln!(text, "Sent: {}", result.sent);
    let _ = writeln!(text, "Failed: {}", result.failed);
    let _ = writeln!(text, "Total Time: {:?}", result.elapsed);

    if let Some(rate) = result.throughput() {
        let _ = writeln!(text, "Throughput: {rate:.2} msg/s");
        let efficiency = rate / admission_limit as f64 * 100.0;
        let _ = writeln!(text, "Efficiency: {efficiency:.1}% of SNS FIFO limit");
    }

    let _ = write!(
        text,
        "Success Rate: {:.2}%",
        result.success_rate_percent()
    );

    if result.failed > 0 {
        let _ = write!(
            text,
            "\nFailed messages might be due to rate limiting: the admission limit may exceed what the topic accepts"
        );
    }
    text
}
