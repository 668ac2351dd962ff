//! Sitemap writer trait and errors
//!
//! The coordinator drives the write sequence (header on open, one entry per
//! HTML page, footer on close) but never formats markup itself.

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sitemap is already closed")]
    Closed,
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for sitemap sinks
///
/// Implementations are opened (header written) before they are handed to the
/// coordinator. The coordinator serializes all calls behind one lock, so an
/// implementation never sees two `append` calls at once.
pub trait SitemapWriter: Send {
    /// Appends one `<url>` entry for a fetched HTML page
    fn append(&mut self, loc: &str) -> OutputResult<()>;

    /// Writes the envelope footer; no entries may follow
    fn close(&mut self) -> OutputResult<()>;

    /// Number of entries appended so far
    fn entries(&self) -> usize;
}
