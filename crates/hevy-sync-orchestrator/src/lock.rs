//! The cross-execution lock.
//!
//! Acquires a cross-execution lock with a bounded wait; if unavailable but
//! the active marker is stale, the orchestrator proceeds anyway rather than
//! blocking forever on a crashed holder. This is the Rust shape a host
//! environment implements (e.g. a platform-level document lock), alongside
//! the other external interfaces in `hevy-sync-core`.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};

/// A lock held across separate process invocations of the orchestrator.
#[async_trait]
pub trait ImportLock: Send + Sync {
    /// Attempts to acquire the lock, waiting up to `wait`. Returns `true`
    /// on success.
    async fn try_acquire(&self, wait: Duration) -> bool;

    /// Releases the lock. A no-op if not currently held by this instance.
    async fn release(&self);
}

/// A single-process [`ImportLock`] for tests and for hosts with no native
/// cross-execution lock of their own.
pub struct InMemoryImportLock {
    semaphore: Arc<Semaphore>,
    permit: Mutex<Option<OwnedSemaphorePermit>>,
}

impl InMemoryImportLock {
    pub fn new() -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(1)),
            permit: Mutex::new(None),
        }
    }
}

impl Default for InMemoryImportLock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImportLock for InMemoryImportLock {
    async fn try_acquire(&self, wait: Duration) -> bool {
        match tokio::time::timeout(wait, self.semaphore.clone().acquire_owned()).await {
            Ok(Ok(permit)) => {
                *self.permit.lock().await = Some(permit);
                true
            }
            _ => false,
        }
    }

    async fn release(&self) {
        self.permit.lock().await.take();
    }
}
