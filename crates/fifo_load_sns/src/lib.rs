//! AWS-oriented adapters and command-line surface for the SNS FIFO load test.
//!
//! This crate owns runtime integration details (SNS session setup, the
//! publish adapter, configuration parsing and console reporting). The
//! publishing engine itself lives in `fifo_load_core`.

pub mod adapters;
pub mod config;
pub mod report;
