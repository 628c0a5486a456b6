//! Crawl-wide fetch limiter
//!
//! One counting permit pool is shared by every task of a crawl, whatever its
//! recursion depth, so the number of simultaneous outbound requests never
//! exceeds the configured capacity.

use crate::CrawlError;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Bounded pool of fetch permits
#[derive(Debug, Clone)]
pub struct FetchLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// A held fetch permit
///
/// The permit goes back to the pool when this guard is dropped, on every
/// exit path.
#[derive(Debug)]
pub struct FetchPermit {
    _permit: OwnedSemaphorePermit,
}

impl FetchLimiter {
    /// Creates a limiter with the given capacity (at least 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Waits until a permit is available and takes it
    ///
    /// # Returns
    ///
    /// * `Ok(FetchPermit)` - Permit held until the guard is dropped
    /// * `Err(CrawlError::Cancelled)` - The permit pool is no longer usable
    pub async fn acquire(&self) -> Result<FetchPermit, CrawlError> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| CrawlError::Cancelled)?;
        Ok(FetchPermit { _permit: permit })
    }

    /// Configured number of permits
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits currently free
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Permits currently held
    pub fn in_flight(&self) -> usize {
        self.capacity - self.available()
    }
}
