use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

pub const DEFAULT_NUM_MESSAGES: usize = 50_000;
pub const WORKER_COUNT: usize = 80;
pub const ADMISSION_LIMIT: usize = 1_000;
pub const SHARD_COUNT: usize = 3;
pub const GROUPS_PER_SHARD: usize = 10;
pub const CUSTOMER_CARDINALITY: usize = 2_000;
pub const PRODUCT_CARDINALITY: usize = 200;
pub const QUEUE_DEPTH_PER_WORKER: usize = 4;
pub const PROGRESS_INTERVAL: u64 = 500;
pub const PUBLISH_TIMEOUT: Duration = Duration::from_secs(20);
pub const INITIAL_ORDER_STATUS: &str = "processing";

pub const SHARD_ATTRIBUTE: &str = "shard";
pub const HASH_ATTRIBUTE: &str = "hash";

/// Simulated order published as one message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderMessage {
    pub order_id: String,
    pub customer_id: String,
    pub product_id: String,
    #[serde(serialize_with = "serialize_amount")]
    pub amount: f64,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl OrderMessage {
    /// Builds the order for work item `index`. Customer and product ids cycle
    /// through fixed cardinalities so every customer recurs across a run.
    pub fn for_index(index: usize, timestamp: DateTime<Utc>) -> Self {
        Self {
            order_id: format!("ORD-{index:08}"),
            customer_id: format!("CUST-{:04}", index % CUSTOMER_CARDINALITY),
            product_id: format!("PROD-{:03}", index % PRODUCT_CARDINALITY),
            amount: (10 + index % 990) as f64,
            status: INITIAL_ORDER_STATUS.to_string(),
            timestamp,
        }
    }

    pub fn shard_key(&self) -> &str {
        &self.customer_id
    }

    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Whole amounts go on the wire as integers (`10`, not `10.0`).
fn serialize_amount<S: Serializer>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    let whole = amount.fract() == 0.0 && amount.abs() < i64::MAX as f64;
    if whole {
        serializer.serialize_i64(*amount as i64)
    } else {
        serializer.serialize_f64(*amount)
    }
}

/// Everything the transport needs for one publish call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub payload: String,
    pub message_group_id: String,
    pub deduplication_id: String,
    pub attributes: BTreeMap<String, String>,
}

pub fn message_group_id(shard_index: usize, index: usize) -> String {
    format!("shard-{shard_index}-group-{}", index % GROUPS_PER_SHARD)
}

/// Not a function of the message content alone: the timestamp makes every
/// attempt unique to the transport's dedup window.
pub fn deduplication_id(index: usize, unix_nanos: u128) -> String {
    format!("{index:08}-{unix_nanos}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub num_messages: usize,
    pub worker_count: usize,
    pub admission_limit: usize,
    pub shard_count: usize,
    pub queue_capacity: usize,
    pub publish_timeout: Duration,
    pub progress_interval: u64,
}

impl EngineSettings {
    /// Production settings: fixed worker count, admission ceiling and shard
    /// count, with only the message count left to the caller.
    pub fn new(num_messages: usize) -> Self {
        Self::with_workers(num_messages, WORKER_COUNT)
    }

    pub fn with_workers(num_messages: usize, worker_count: usize) -> Self {
        Self {
            num_messages,
            worker_count,
            admission_limit: ADMISSION_LIMIT,
            shard_count: SHARD_COUNT,
            queue_capacity: worker_count.saturating_mul(QUEUE_DEPTH_PER_WORKER),
            publish_timeout: PUBLISH_TIMEOUT,
            progress_interval: PROGRESS_INTERVAL,
        }
    }

    pub fn admission_limit(mut self, admission_limit: usize) -> Self {
        self.admission_limit = admission_limit;
        self
    }

    pub fn shard_count(mut self, shard_count: usize) -> Self {
        self.shard_count = shard_count;
        self
    }

    pub fn publish_timeout(mut self, publish_timeout: Duration) -> Self {
        self.publish_timeout = publish_timeout;
        self
    }

    pub fn progress_interval(mut self, progress_interval: u64) -> Self {
        self.progress_interval = progress_interval;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.worker_count == 0 {
            return Err(ValidationError::new(
                "worker_count must be a positive integer",
            ));
        }

        if self.admission_limit == 0 {
            return Err(ValidationError::new(
                "admission_limit must be a positive integer",
            ));
        }

        if self.shard_count == 0 {
            return Err(ValidationError::new(
                "shard_count must be a positive integer",
            ));
        }

        if self.queue_capacity == 0 {
            return Err(ValidationError::new(
                "queue_capacity must be a positive integer",
            ));
        }

        if self.publish_timeout.is_zero() {
            return Err(ValidationError::new("publish_timeout must be non-zero"));
        }

        Ok(())
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::new(DEFAULT_NUM_MESSAGES)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}
