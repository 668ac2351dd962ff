//! Crawler coordinator - main crawl orchestration logic
//!
//! This module runs one crawl from a seed URL to completion:
//! - Opening the sitemap and seeding the frontier
//! - Dispatching fetches with bounded concurrency
//! - Expanding each completed fetch into new tasks
//! - Detecting termination when no task is outstanding
//! - Closing the sitemap
//!
//! # Completion ordering
//!
//! When a fetch completes, its sitemap entry is written first. Then, under
//! the frontier lock, its links are accepted (raising the outstanding count)
//! and the task itself is retired (lowering it by one). Only a completion
//! that leaves the count at zero wakes the coordinator, so the crawl cannot
//! end while a parent's children are still being scheduled. The execution
//! slot is held until all of this is done.

use crate::config::{CollectorConfig, CrawlerConfig};
use crate::crawler::dispatcher::{Dispatcher, FetchTask};
use crate::crawler::fetcher::{FetchResult, Fetcher, HttpFetcher};
use crate::crawler::frontier::Frontier;
use crate::output::{
    format_progress_line, CrawlSummary, OutputError, SitemapWriter, XmlSitemapWriter,
};
use crate::url::{canonicalize_url, CrawlScope};
use crate::Result;
use chrono::Utc;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

/// Handle for stopping a crawl early
///
/// After `cancel()` no new links are scheduled; fetches already queued or in
/// flight finish normally and the sitemap is still closed.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Main crawler coordinator structure
pub struct Coordinator<F: Fetcher> {
    seed_url: String,
    scope: CrawlScope,
    config: CrawlerConfig,
    fetcher: Arc<F>,
    cancel: CancelHandle,
}

impl<F: Fetcher> Coordinator<F> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `seed_url` - Absolute http(s) URL the crawl starts from; its
    ///   canonical form is also the scope prefix
    /// * `config` - The crawler configuration
    /// * `fetcher` - Source of pages
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CollectorError)` - The seed URL is not a valid absolute URL
    pub fn new(seed_url: &str, config: CrawlerConfig, fetcher: F) -> Result<Self> {
        let seed_url = canonicalize_url(seed_url)?;
        let scope = CrawlScope::new(seed_url.clone());

        Ok(Self {
            seed_url,
            scope,
            config,
            fetcher: Arc::new(fetcher),
            cancel: CancelHandle::default(),
        })
    }

    /// The canonical seed URL
    pub fn seed_url(&self) -> &str {
        &self.seed_url
    }

    /// Returns a handle that can stop this crawl early
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Crawls the site into a sitemap file at `path`
    ///
    /// The file is truncated and the envelope header written before any
    /// fetch starts; failure to open it aborts the crawl.
    pub async fn collect(&self, path: &Path) -> Result<CrawlSummary> {
        let writer = XmlSitemapWriter::create(path)?;
        tracing::info!("Writing sitemap to {}", path.display());
        self.run(writer).await
    }

    /// Runs the crawl, writing entries to an already opened sitemap
    ///
    /// Individual fetch failures never end the crawl. A sitemap write error
    /// is returned only after the crawl has drained and the footer attempt
    /// has been made.
    pub async fn run<W>(&self, writer: W) -> Result<CrawlSummary>
    where
        W: SitemapWriter + 'static,
    {
        let started_at = Utc::now();
        tracing::info!(
            "Starting crawl of {} (concurrency {}, max duration {}s)",
            self.seed_url,
            self.config.concurrency,
            self.config.max_duration_secs
        );

        let crawl = Arc::new(CrawlContext {
            fetcher: Arc::clone(&self.fetcher),
            dispatcher: Dispatcher::new(&self.config),
            frontier: Mutex::new(Frontier::new(self.scope.clone())),
            sitemap: Mutex::new(writer),
            sitemap_error: Mutex::new(None),
            fetched: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
            cancel: self.cancel.clone(),
            finished: Notify::new(),
        });

        let seed_task = crawl.frontier().seed(&self.seed_url);
        if let Some(task) = seed_task {
            CrawlContext::submit(&crawl, task);
        }

        loop {
            let notified = crawl.finished.notified();
            if crawl.frontier().outstanding() == 0 {
                break;
            }
            notified.await;
        }

        let processed = crawl.frontier().visited_count();
        let (close_result, pages_written) = {
            let mut sitemap = lock(&crawl.sitemap);
            (sitemap.close(), sitemap.entries())
        };

        let summary = CrawlSummary {
            processed,
            fetched: crawl.fetched.load(Ordering::SeqCst),
            pages_written,
            failures: crawl.failures.load(Ordering::SeqCst),
            peak_in_flight: crawl.dispatcher.peak_in_flight(),
            cancelled: self.cancel.is_cancelled(),
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "Crawl completed: {} URLs processed, {} sitemap entries in {:.2}s",
            summary.processed,
            summary.pages_written,
            summary.duration_secs()
        );

        if let Some(e) = lock(&crawl.sitemap_error).take() {
            return Err(e.into());
        }
        close_result?;

        Ok(summary)
    }
}

/// State shared by every fetch task of one crawl
struct CrawlContext<F, W> {
    fetcher: Arc<F>,
    dispatcher: Dispatcher,
    frontier: Mutex<Frontier>,
    sitemap: Mutex<W>,
    sitemap_error: Mutex<Option<OutputError>>,
    fetched: AtomicUsize,
    failures: AtomicUsize,
    cancel: CancelHandle,
    finished: Notify,
}

impl<F, W> CrawlContext<F, W>
where
    F: Fetcher,
    W: SitemapWriter + 'static,
{
    /// Starts a fetch for a task the frontier has already counted
    fn submit(crawl: &Arc<Self>, task: FetchTask) {
        let crawl = Arc::clone(crawl);
        tokio::spawn(async move {
            crawl.run_task(task).await;
        });
    }

    async fn run_task(self: Arc<Self>, task: FetchTask) {
        let mut ticket = TaskTicket {
            crawl: Arc::clone(&self),
            url: task.url.clone(),
            retired: false,
        };
        let (result, slot) = self.dispatcher.execute(&self.fetcher, task).await;
        self.complete(&result, &mut ticket);
        drop(slot);
    }

    /// Completion handler for one fetch
    fn complete(self: &Arc<Self>, result: &FetchResult, ticket: &mut TaskTicket<F, W>) {
        self.fetched.fetch_add(1, Ordering::SeqCst);

        if !result.is_success() {
            self.failures.fetch_add(1, Ordering::SeqCst);
        } else if result.is_html() {
            self.append_to_sitemap(&result.url);
        }

        let (children, remaining) = {
            let mut frontier = self.frontier();
            let children = if self.cancel.is_cancelled() {
                Vec::new()
            } else {
                frontier.expand(result)
            };
            let remaining = frontier.retire();
            ticket.retired = true;
            (children, remaining)
        };

        for child in children {
            Self::submit(self, child);
        }

        let line = format_progress_line(result, remaining);
        if result.is_success() {
            tracing::info!("{}", line);
        } else {
            tracing::warn!("{}", line);
        }

        if remaining == 0 {
            self.finished.notify_one();
        }
    }

    /// Writes one entry on the calling worker
    ///
    /// Each entry is a single small buffered write plus a flush. This stays off
    /// `block_in_place`, which panics on a current-thread runtime.
    fn append_to_sitemap(&self, url: &str) {
        let appended = lock(&self.sitemap).append(url);
        if let Err(e) = appended {
            tracing::error!("Failed to write sitemap entry for {}: {}", url, e);
            lock(&self.sitemap_error).get_or_insert(e);
        }
    }

    fn frontier(&self) -> MutexGuard<'_, Frontier> {
        lock(&self.frontier)
    }
}

/// A counted task that has not been retired yet
///
/// If the task unwinds before its completion runs, dropping the ticket
/// retires it so the outstanding count can still reach zero.
struct TaskTicket<F, W> {
    crawl: Arc<CrawlContext<F, W>>,
    url: String,
    retired: bool,
}

impl<F, W> Drop for TaskTicket<F, W> {
    fn drop(&mut self) {
        if self.retired {
            return;
        }

        tracing::error!("Task for {} ended before completing", self.url);
        self.crawl.failures.fetch_add(1, Ordering::SeqCst);

        let remaining = lock(&self.crawl.frontier).retire();
        if remaining == 0 {
            self.crawl.finished.notify_one();
        }
    }
}

/// Locks a mutex, recovering the data if another task panicked while holding it
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs a complete crawl as configured
///
/// This is the main entry point. It will:
/// 1. Build the HTTP fetcher
/// 2. Truncate the sitemap file and write its header
/// 3. Crawl from the seed until no task is outstanding
/// 4. Write the sitemap footer
///
/// # Example
///
/// ```no_run
/// use site_collector::config::{build_config, CliOverrides};
/// use site_collector::crawler::collect;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = build_config("https://example.com", None, CliOverrides::default())?;
/// let summary = collect(&config).await?;
/// println!("{} URLs processed", summary.processed);
/// # Ok(())
/// # }
/// ```
pub async fn collect(config: &CollectorConfig) -> Result<CrawlSummary> {
    let fetcher = HttpFetcher::new()?;
    let coordinator = Coordinator::new(&config.seed_url, config.crawler.clone(), fetcher)?;
    coordinator
        .collect(Path::new(&config.output.sitemap_path))
        .await
}
