//! Single-producer work queue feeding the worker pool.

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::contract::ValidationError;

/// Position of one message in the run, in `[0, num_messages)`.
pub type WorkItem = usize;

/// Bounded FIFO shared by all workers. Each item is handed to exactly one
/// worker; `next` returns `None` once the dispatcher has finished and the
/// queue is drained.
#[derive(Debug)]
pub struct WorkQueue {
    receiver: Mutex<mpsc::Receiver<WorkItem>>,
    capacity: usize,
}

impl WorkQueue {
    pub async fn next(&self) -> Option<WorkItem> {
        self.receiver.lock().await.recv().await
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Starts the producer for `0..num_messages` and returns the queue workers
/// consume from.
///
/// The producer waits whenever the queue is full, so at most `capacity`
/// items are buffered ahead of the workers. Dropping the sender at the end
/// closes the queue.
pub fn spawn_dispatcher(
    num_messages: usize,
    capacity: usize,
) -> Result<(WorkQueue, JoinHandle<usize>), ValidationError> {
    if capacity == 0 {
        return Err(ValidationError::new(
            "queue capacity must be a positive integer",
        ));
    }

    let (sender, receiver) = mpsc::channel(capacity);
    let handle = tokio::spawn(async move {
        let mut dispatched = 0usize;
        for index in 0..num_messages {
            if sender.send(index).await.is_err() {
                // Every worker is gone; nothing left to feed.
                break;
            }
            dispatched += 1;
        }
        dispatched
    });

    let queue = WorkQueue {
        receiver: Mutex::new(receiver),
        capacity,
    };
    Ok((queue, handle))
}
