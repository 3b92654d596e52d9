#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use fifo_load_core::{PublishError, PublishRequest, TopicPublisher};

/// Accepts every publish.
#[derive(Debug, Default)]
pub struct AlwaysSucceeds {
    calls: AtomicUsize,
}

impl AlwaysSucceeds {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TopicPublisher for AlwaysSucceeds {
    async fn publish(&self, _request: PublishRequest) -> Result<(), PublishError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Rejects the first call and every third call after it, regardless of which
/// worker makes it.
#[derive(Debug, Default)]
pub struct FailsEveryThirdCall {
    calls: AtomicUsize,
}

impl TopicPublisher for FailsEveryThirdCall {
    async fn publish(&self, _request: PublishRequest) -> Result<(), PublishError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call % 3 == 0 {
            return Err(PublishError::Transport(format!("throttled call {call}")));
        }
        Ok(())
    }
}

/// Never answers within any reasonable deadline.
#[derive(Debug)]
pub struct Stalls {
    pub delay: Duration,
}

impl TopicPublisher for Stalls {
    async fn publish(&self, _request: PublishRequest) -> Result<(), PublishError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

/// Tracks how many calls are inside `publish` at the same time.
#[derive(Debug)]
pub struct InFlightProbe {
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlightProbe {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl TopicPublisher for InFlightProbe {
    async fn publish(&self, _request: PublishRequest) -> Result<(), PublishError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Records every request it receives.
#[derive(Debug, Default)]
pub struct Capturing {
    requests: Mutex<Vec<PublishRequest>>,
}

impl Capturing {
    pub fn requests(&self) -> Vec<PublishRequest> {
        self.requests.lock().expect("poisoned mutex").clone()
    }
}

impl TopicPublisher for Capturing {
    async fn publish(&self, request: PublishRequest) -> Result<(), PublishError> {
        self.requests.lock().expect("poisoned mutex").push(request);
        Ok(())
    }
}
