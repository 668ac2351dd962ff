//! Frontier bookkeeping: the visited set and the outstanding-task count
//!
//! A URL enters the visited set the moment it is accepted for scheduling,
//! not when its fetch completes. The check and the insert happen in one call
//! on `&mut self`, so with the frontier behind a single lock no two
//! completions can both see a URL as new.

use crate::crawler::dispatcher::FetchTask;
use crate::crawler::fetcher::FetchResult;
use crate::url::{canonicalize_url, CrawlScope};
use std::collections::HashSet;

/// Visited set and outstanding count for one crawl
#[derive(Debug)]
pub struct Frontier {
    scope: CrawlScope,
    visited: HashSet<String>,
    outstanding: usize,
}

impl Frontier {
    /// Creates an empty frontier for the given scope
    pub fn new(scope: CrawlScope) -> Self {
        Self {
            scope,
            visited: HashSet::new(),
            outstanding: 0,
        }
    }

    /// Accepts the seed URL
    ///
    /// The seed goes into the visited set like any other URL, so pages that
    /// link back to it do not schedule it again.
    pub fn seed(&mut self, url: &str) -> Option<FetchTask> {
        self.accept(url.to_string(), "")
    }

    /// Turns one completed fetch into new tasks
    ///
    /// Failed fetches are dead ends. For successful ones, each link is
    /// canonicalized, then dropped if it is outside the scope or already
    /// visited; the rest are marked visited and counted as outstanding before
    /// this returns.
    pub fn expand(&mut self, result: &FetchResult) -> Vec<FetchTask> {
        if !result.is_success() {
            return Vec::new();
        }

        let mut tasks = Vec::new();
        for link in &result.links {
            let url = match canonicalize_url(link) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("Skipping link {} on {}: {}", link, result.url, e);
                    continue;
                }
            };

            if !self.scope.contains(&url) {
                tracing::trace!("Out of scope: {}", url);
                continue;
            }

            if let Some(task) = self.accept(url, &result.url) {
                tasks.push(task);
            }
        }

        tasks
    }

    /// Marks one task as finished and returns how many remain
    ///
    /// Call this after `expand` for the same result, under the same lock, so
    /// the count cannot touch zero while children are still being added.
    pub fn retire(&mut self) -> usize {
        debug_assert!(self.outstanding > 0, "retire called with no outstanding tasks");
        self.outstanding = self.outstanding.saturating_sub(1);
        self.outstanding
    }

    /// Check-then-insert into the visited set
    fn accept(&mut self, url: String, parent_url: &str) -> Option<FetchTask> {
        if self.visited.contains(&url) {
            tracing::trace!("Already visited: {}", url);
            return None;
        }

        self.visited.insert(url.clone());
        self.outstanding += 1;

        Some(FetchTask {
            url,
            parent_url: parent_url.to_string(),
        })
    }

    /// Tasks submitted but not yet completed
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Distinct URLs accepted so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Returns true if the URL has been accepted
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }
}
