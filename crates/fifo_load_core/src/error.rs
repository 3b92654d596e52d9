use std::time::Duration;

use thiserror::Error;

use crate::contract::ValidationError;

/// Outcome of a single failed publish attempt. Never retried by the engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PublishError {
    #[error("publish timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport rejected publish: {0}")]
    Transport(String),

    #[error("could not build publish request: {0}")]
    InvalidRequest(String),
}

/// Errors that stop a run before or after the work loop. Per-message
/// failures are counted instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid engine settings: {0}")]
    InvalidSettings(#[from] ValidationError),

    #[error("{task} task failed: {message}")]
    TaskFailed { task: &'static str, message: String },
}
