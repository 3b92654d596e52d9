use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;

/// Final tally of a run. `sent + failed` equals the number of messages the
/// run was asked to publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestResult {
    pub sent: u64,
    pub failed: u64,
    pub elapsed: Duration,
}

impl TestResult {
    pub fn total(&self) -> u64 {
        self.sent + self.failed
    }

    /// Successful messages per second, `None` when no time has elapsed.
    pub fn throughput(&self) -> Option<f64> {
        let seconds = self.elapsed.as_secs_f64();
        (seconds > 0.0).then(|| self.sent as f64 / seconds)
    }

    pub fn success_rate_percent(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        self.sent as f64 / self.total() as f64 * 100.0
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProgressObservation {
    pub sent: u64,
    pub target: usize,
    pub messages_per_second: f64,
    pub elapsed_seconds: f64,
    pub shard: usize,
    pub shard_key: String,
}

/// Success and failure counters shared by every worker of one run.
#[derive(Debug)]
pub struct ResultAggregator {
    sent: AtomicU64,
    failed: AtomicU64,
    progress_reported: AtomicU64,
    started_at: Instant,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    pub fn started_at(started_at: Instant) -> Self {
        Self {
            sent: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            progress_reported: AtomicU64::new(0),
            started_at,
        }
    }

    /// Returns the cumulative success count including this one.
    pub fn record_success(&self) -> u64 {
        self.sent.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn record_failure(&self) -> u64 {
        self.failed.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Acquire)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Acquire)
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Builds the observation for a milestone and counts it as reported.
    pub fn progress(
        &self,
        sent: u64,
        target: usize,
        shard: usize,
        shard_key: &str,
    ) -> ProgressObservation {
        let elapsed = self.elapsed().as_secs_f64();
        let messages_per_second = if elapsed > 0.0 {
            sent as f64 / elapsed
        } else {
            sent as f64
        };
        self.progress_reported.fetch_add(1, Ordering::AcqRel);

        ProgressObservation {
            sent,
            target,
            messages_per_second,
            elapsed_seconds: elapsed,
            shard,
            shard_key: shard_key.to_string(),
        }
    }

    pub fn progress_reported(&self) -> u64 {
        self.progress_reported.load(Ordering::Acquire)
    }

    /// Only meaningful once every worker has been joined.
    pub fn snapshot(&self) -> TestResult {
        TestResult {
            sent: self.sent(),
            failed: self.failed(),
            elapsed: self.elapsed(),
        }
    }
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// True for every `interval`-th cumulative success.
pub fn is_progress_milestone(sent: u64, interval: u64) -> bool {
    interval > 0 && sent > 0 && sent % interval == 0
}
