//! Bounded-concurrency fetch execution
//!
//! This module handles:
//! - Global concurrency limiting via a semaphore
//! - In-flight accounting (current and peak)
//! - Turning fetcher panics and overruns into failure records

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{FetchRequest, FetchResult, Fetcher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Semaphore, SemaphorePermit};

/// Extra time a fetcher gets past its own timeout before the dispatcher gives up on it
const TIMEOUT_GRACE: Duration = Duration::from_secs(1);

/// A URL accepted for fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTask {
    pub url: String,

    /// The page the URL was found on; empty for the seed
    pub parent_url: String,
}

/// An occupied execution slot
///
/// The slot stays taken until this guard is dropped, which the coordinator
/// does only after the completed fetch has been expanded.
pub struct Slot<'a> {
    _permit: Option<SemaphorePermit<'a>>,
    in_flight: &'a AtomicUsize,
}

impl Drop for Slot<'_> {
    fn drop(&mut self) {
        // Runs before the permit field is released.
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Dispatcher runs fetches with a hard ceiling on parallelism
///
/// The dispatcher coordinates:
/// - At most `concurrency` fetches running at once
/// - A per-fetch timeout budget
/// - Delivery of a `FetchResult` for every task, whatever the fetcher does
pub struct Dispatcher {
    slots: Semaphore,
    capacity: usize,
    user_agent: String,
    timeout: Duration,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl Dispatcher {
    /// Creates a dispatcher from the crawler configuration
    pub fn new(config: &CrawlerConfig) -> Self {
        let capacity = config.concurrency.max(1);
        Self {
            slots: Semaphore::new(capacity),
            capacity,
            user_agent: config.user_agent.clone(),
            timeout: config.max_duration(),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Waits for a free slot
    async fn acquire(&self) -> Slot<'_> {
        // The semaphore is never closed, so acquire cannot fail.
        let permit = self.slots.acquire().await.ok();

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        Slot {
            _permit: permit,
            in_flight: &self.in_flight,
        }
    }

    /// Runs one fetch inside a slot
    ///
    /// The fetch runs on its own task so a panic inside the fetcher is caught
    /// as a `JoinError`. A fetcher that overruns its timeout is aborted.
    /// Either way the caller gets a failure record, never nothing.
    ///
    /// # Returns
    ///
    /// The fetch result together with the slot, which the caller releases by
    /// dropping it.
    pub async fn execute<F: Fetcher>(
        &self,
        fetcher: &Arc<F>,
        task: FetchTask,
    ) -> (FetchResult, Slot<'_>) {
        let slot = self.acquire().await;
        let started = Instant::now();

        let request = FetchRequest {
            url: task.url.clone(),
            parent_url: task.parent_url.clone(),
            user_agent: self.user_agent.clone(),
            timeout: self.timeout,
        };

        let fetcher = Arc::clone(fetcher);
        let mut handle = tokio::spawn(async move { fetcher.fetch(&request).await });

        let deadline = self.timeout.saturating_add(TIMEOUT_GRACE);
        let result = match tokio::time::timeout(deadline, &mut handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => {
                tracing::error!("Fetch task for {} failed: {}", task.url, join_error);
                FetchResult::failed(
                    task.url,
                    task.parent_url,
                    started.elapsed(),
                    format!("Fetch task failed: {}", join_error),
                )
            }
            Err(_) => {
                handle.abort();
                FetchResult::failed(
                    task.url,
                    task.parent_url,
                    started.elapsed(),
                    "Request timeout",
                )
            }
        };

        (result, slot)
    }

    /// Maximum number of simultaneous fetches
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of fetches currently holding a slot
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest in-flight count observed so far
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}
