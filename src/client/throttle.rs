//! Bounded concurrency for in-flight requests.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::{Error, Result};

/// Caps the number of simultaneous in-flight requests.
///
/// Backed by a counting semaphore sized to the configured limit; a client
/// without a limit passes requests through untouched. Each request holds
/// an owned permit for its full duration, so the slot is returned on every
/// exit path, including panics and transport failures.
pub(crate) struct RequestThrottle {
    semaphore: Option<Arc<Semaphore>>,
}

impl RequestThrottle {
    /// Create a throttle with the given capacity, or a pass-through when
    /// `limit` is `None`.
    pub(crate) fn new(limit: Option<usize>) -> Self {
        Self {
            semaphore: limit.map(|capacity| Arc::new(Semaphore::new(capacity.max(1)))),
        }
    }

    /// Wait for a slot, suspending until one frees up.
    ///
    /// Returns `None` when no limit is configured. Fails with
    /// [`Error::ClientClosed`] once the client has been closed, which also
    /// wakes any callers still waiting for a slot.
    pub(crate) async fn acquire(&self) -> Result<Option<OwnedSemaphorePermit>> {
        match &self.semaphore {
            Some(semaphore) => {
                let permit = semaphore
                    .clone()
                    .acquire_owned()
                    .await
                    .map_err(|_| Error::ClientClosed)?;
                Ok(Some(permit))
            }
            None => Ok(None),
        }
    }

    /// Close the semaphore so pending and future acquisitions fail fast.
    pub(crate) fn close(&self) {
        if let Some(semaphore) = &self.semaphore {
            semaphore.close();
        }
    }
}
