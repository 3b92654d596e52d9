//! Publishing engine for the SNS FIFO throughput load generator.
//!
//! This crate owns the deterministic and concurrent parts of a load run:
//! shard assignment, admission control, work dispatch, the worker pool and
//! result aggregation. It intentionally excludes AWS SDK concerns; the
//! transport is reached through [`engine::TopicPublisher`].

pub mod admission;
pub mod contract;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod results;
pub mod sharding;
pub mod telemetry;

pub use admission::{AdmissionGate, AdmissionPermit};
pub use contract::{EngineSettings, OrderMessage, PublishRequest, ValidationError};
pub use engine::{run_load_test, RunReport, TopicPublisher};
pub use error::{EngineError, PublishError};
pub use results::{ResultAggregator, TestResult};
pub use sharding::{compute_shard, ShardAssignment};
