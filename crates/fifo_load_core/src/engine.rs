//! Worker pool that turns work items into published messages.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Utc;
use serde_json::json;
use tokio::task::JoinSet;

use crate::admission::AdmissionGate;
use crate::contract::{
    deduplication_id, message_group_id, EngineSettings, OrderMessage, PublishRequest,
    HASH_ATTRIBUTE, SHARD_ATTRIBUTE,
};
use crate::dispatch::{spawn_dispatcher, WorkItem, WorkQueue};
use crate::error::{EngineError, PublishError};
use crate::results::{is_progress_milestone, ResultAggregator, TestResult};
use crate::sharding::{compute_shard, ShardAssignment};
use crate::telemetry::{log_error, log_info};

const COMPONENT: &str = "engine";

/// Transport seam. One call per message; the engine applies the deadline
/// and never retries.
pub trait TopicPublisher: Send + Sync + 'static {
    fn publish(
        &self,
        request: PublishRequest,
    ) -> impl Future<Output = Result<(), PublishError>> + Send;
}

impl<T: TopicPublisher> TopicPublisher for Arc<T> {
    fn publish(
        &self,
        request: PublishRequest,
    ) -> impl Future<Output = Result<(), PublishError>> + Send {
        (**self).publish(request)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub result: TestResult,
    pub dispatched: usize,
    /// Most publish calls observed in flight at the same time.
    pub peak_in_flight: usize,
    /// Progress observations emitted during the run.
    pub progress_reported: u64,
}

/// State shared by every worker of one run. Built fresh per run.
struct RunContext<P> {
    publisher: P,
    gate: AdmissionGate,
    results: ResultAggregator,
    settings: EngineSettings,
}

/// Publishes `settings.num_messages` messages and returns once every worker
/// has drained the queue.
///
/// Per-message failures are counted in the result and never abort the run.
/// Errors are returned only for invalid settings or a worker task that did
/// not finish.
pub async fn run_load_test<P: TopicPublisher>(
    publisher: P,
    settings: EngineSettings,
) -> Result<RunReport, EngineError> {
    settings.validate()?;
    let gate = AdmissionGate::new(settings.admission_limit)?;

    log_info(
        COMPONENT,
        "run_started",
        json!({
            "num_messages": settings.num_messages,
            "workers": settings.worker_count,
            "admission_limit": settings.admission_limit,
            "shard_count": settings.shard_count,
            "queue_capacity": settings.queue_capacity,
            "publish_timeout_ms": settings.publish_timeout.as_millis(),
        }),
    );

    let context = Arc::new(RunContext {
        publisher,
        gate,
        results: ResultAggregator::new(),
        settings,
    });

    let (queue, dispatcher) =
        spawn_dispatcher(context.settings.num_messages, context.settings.queue_capacity)?;
    let queue = Arc::new(queue);

    let mut workers = JoinSet::new();
    for _ in 0..context.settings.worker_count {
        workers.spawn(run_worker(Arc::clone(&context), Arc::clone(&queue)));
    }
    // Workers own the queue from here; if they all die the producer unblocks.
    drop(queue);

    let mut task_failure = None;
    while let Some(joined) = workers.join_next().await {
        if let Err(error) = joined {
            task_failure.get_or_insert(EngineError::TaskFailed {
                task: "worker",
                message: error.to_string(),
            });
        }
    }

    let dispatched = dispatcher.await.map_err(|error| EngineError::TaskFailed {
        task: "dispatcher",
        message: error.to_string(),
    })?;
    if let Some(error) = task_failure {
        return Err(error);
    }

    let result = context.results.snapshot();
    let report = RunReport {
        result,
        dispatched,
        peak_in_flight: context.gate.peak_in_flight(),
        progress_reported: context.results.progress_reported(),
    };

    log_info(
        COMPONENT,
        "run_completed",
        json!({
            "sent": result.sent,
            "failed": result.failed,
            "elapsed_ms": result.elapsed.as_millis(),
            "dispatched": dispatched,
            "peak_in_flight": report.peak_in_flight,
            "progress_reported": report.progress_reported,
        }),
    );

    Ok(report)
}

async fn run_worker<P: TopicPublisher>(context: Arc<RunContext<P>>, queue: Arc<WorkQueue>) -> usize {
    let mut processed = 0usize;
    while let Some(index) = queue.next().await {
        process_item(&context, index).await;
        processed += 1;
    }
    processed
}

async fn process_item<P: TopicPublisher>(context: &RunContext<P>, index: WorkItem) {
    let message = OrderMessage::for_index(index, Utc::now());
    let prepared = build_publish_request(index, &message, context.settings.shard_count);

    let outcome = match prepared {
        Ok((request, assignment)) => publish_with_deadline(context, request)
            .await
            .map(|()| assignment),
        Err(error) => Err(error),
    };

    match outcome {
        Ok(assignment) => {
            let sent = context.results.record_success();
            if is_progress_milestone(sent, context.settings.progress_interval) {
                let observation = context.results.progress(
                    sent,
                    context.settings.num_messages,
                    assignment.shard_index,
                    message.shard_key(),
                );
                log_info(
                    COMPONENT,
                    "progress",
                    json!({
                        "sent": observation.sent,
                        "target": observation.target,
                        "messages_per_second": observation.messages_per_second,
                        "elapsed_seconds": observation.elapsed_seconds,
                        "shard": observation.shard,
                        "shard_key": observation.shard_key,
                    }),
                );
            }
        }
        Err(error) => {
            context.results.record_failure();
            log_error(
                COMPONENT,
                "publish_failed",
                json!({
                    "index": index,
                    "order_id": message.order_id,
                    "shard_key": message.shard_key(),
                    "error": error.to_string(),
                }),
            );
        }
    }
}

async fn publish_with_deadline<P: TopicPublisher>(
    context: &RunContext<P>,
    request: PublishRequest,
) -> Result<(), PublishError> {
    let timeout = context.settings.publish_timeout;
    let permit = context
        .gate
        .acquire()
        .await
        .map_err(|error| PublishError::Transport(format!("admission gate closed: {error}")))?;

    let outcome = match tokio::time::timeout(timeout, context.publisher.publish(request)).await {
        Ok(result) => result,
        Err(_) => Err(PublishError::Timeout(timeout)),
    };

    drop(permit);
    outcome
}

/// Serializes `message` and attaches the shard-derived routing fields.
///
/// The customer id is the shard key, so every order of one customer lands in
/// the same shard; the group rotation spreads those orders over several
/// ordering groups inside that shard.
pub fn build_publish_request(
    index: WorkItem,
    message: &OrderMessage,
    shard_count: usize,
) -> Result<(PublishRequest, ShardAssignment), PublishError> {
    let payload = message
        .to_payload()
        .map_err(|error| PublishError::InvalidRequest(error.to_string()))?;
    let assignment = compute_shard(message.shard_key(), shard_count)
        .map_err(|error| PublishError::InvalidRequest(error.to_string()))?;

    let unix_nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();

    let attributes = BTreeMap::from([
        (
            SHARD_ATTRIBUTE.to_string(),
            assignment.shard_index.to_string(),
        ),
        (HASH_ATTRIBUTE.to_string(), assignment.fingerprint.clone()),
    ]);

    let request = PublishRequest {
        payload,
        message_group_id: message_group_id(assignment.shard_index, index),
        deduplication_id: deduplication_id(index, unix_nanos),
        attributes,
    };
    Ok((request, assignment))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn request_routes_by_customer_shard() {
        let timestamp = Utc.with_ymd_and_hms(2026, 2, 14, 0, 0, 0).unwrap();
        let message = OrderMessage::for_index(2_007, timestamp);

        let (request, assignment) =
            build_publish_request(2_007, &message, 3).expect("request should build");

        // CUST-0007 hashes to shard 2.
        assert_eq!(assignment.shard_index, 2);
        assert_eq!(request.message_group_id, "shard-2-group-7");
        assert_eq!(request.attributes["shard"], "2");
        assert_eq!(request.attributes["hash"], "8f3f81e493f14da1");
        assert!(request.deduplication_id.starts_with("00002007-"));
        assert!(request.payload.contains("\"order_id\":\"ORD-00002007\""));
    }

    #[test]
    fn request_rejects_zero_shards() {
        let message = OrderMessage::for_index(1, Utc::now());
        let error = build_publish_request(1, &message, 0).expect_err("zero shards should fail");
        assert!(matches!(error, PublishError::InvalidRequest(_)));
    }
}
