//! Bounded concurrency for collaborator calls.

use std::sync::Arc;

use storyvox_error::{PipelineError, PipelineErrorKind};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::trace;

/// Caps how many collaborator calls are in flight at once.
///
/// Clones share the same permits, so one limiter handed to several
/// orchestrators bounds them all together.
///
/// # Examples
///
/// ```
/// use storyvox_pipeline::CallLimiter;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let limiter = CallLimiter::new(2);
/// let guard = limiter.acquire().await.unwrap();
/// assert_eq!(limiter.available(), 1);
/// drop(guard);
/// assert_eq!(limiter.available(), 2);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CallLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl CallLimiter {
    /// Create a limiter allowing `capacity` concurrent calls (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Wait for a free slot.
    ///
    /// The slot is released when the returned guard is dropped.
    pub async fn acquire(&self) -> Result<CallGuard, PipelineError> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| PipelineError::new(PipelineErrorKind::Task(e.to_string())))?;
        trace!(available = self.available(), "Call slot acquired");
        Ok(CallGuard { _permit: permit })
    }

    /// Slots currently free.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Total slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Holds one call slot until dropped.
#[derive(Debug)]
pub struct CallGuard {
    _permit: OwnedSemaphorePermit,
}
