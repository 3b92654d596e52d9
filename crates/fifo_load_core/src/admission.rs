//! Concurrency ceiling for in-flight publish calls.
//!
//! [`AdmissionGate`] is a counting semaphore, not a rate limiter: a permit is
//! held for the entire duration of one publish call and returned when the
//! call finishes, whatever its outcome. The capacity therefore bounds how
//! many calls are outstanding at once. It does not refill tokens over time
//! and places no limit on requests per second; a fast transport will see
//! throughput well above the capacity figure.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

use crate::contract::ValidationError;

#[derive(Debug)]
pub struct AdmissionGate {
    capacity: usize,
    semaphore: Arc<Semaphore>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

/// Slot held while one publish call is outstanding. Dropping it releases the
/// slot.
#[derive(Debug)]
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
    in_flight: Arc<AtomicUsize>,
}

impl AdmissionGate {
    pub fn new(capacity: usize) -> Result<Self, ValidationError> {
        if capacity == 0 {
            return Err(ValidationError::new(
                "admission capacity must be a positive integer",
            ));
        }
        if capacity > Semaphore::MAX_PERMITS {
            return Err(ValidationError::new(format!(
                "admission capacity exceeds {}",
                Semaphore::MAX_PERMITS
            )));
        }

        Ok(Self {
            capacity,
            semaphore: Arc::new(Semaphore::new(capacity)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Waits until a slot is free.
    ///
    /// Fails only if the gate has been closed, which the engine never does
    /// while workers are running.
    pub async fn acquire(&self) -> Result<AdmissionPermit, AcquireError> {
        let permit = Arc::clone(&self.semaphore).acquire_owned().await?;
        let current = self.in_flight.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::AcqRel);

        Ok(AdmissionPermit {
            _permit: permit,
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Highest number of simultaneously held permits since the gate was
    /// created.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::Acquire)
    }
}

impl Drop for AdmissionPermit {
    fn drop(&mut self) {
        // Counter goes down before the semaphore slot is returned.
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}
