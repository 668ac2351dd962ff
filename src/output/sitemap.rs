//! XML sitemap writer
//!
//! Produces the sitemaps.org `urlset` document:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="https://www.sitemaps.org/schemas/sitemap/0.9">
//! <url>
//!   <loc>https://example.com/</loc>
//!   <changefreq>weekly</changefreq>
//!   <priority>1</priority>
//! </url>
//! </urlset>
//! ```

use crate::output::traits::{OutputError, OutputResult, SitemapWriter};
use quick_xml::escape::escape;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const HEADER: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
    "<urlset xmlns=\"https://www.sitemaps.org/schemas/sitemap/0.9\">\n",
);

const FOOTER: &str = "</urlset>";

const CHANGEFREQ: &str = "weekly";
const PRIORITY: &str = "1";

/// Sitemap writer over any byte sink
pub struct XmlSitemapWriter<W: Write> {
    out: W,
    entries: usize,
    closed: bool,
}

impl XmlSitemapWriter<BufWriter<File>> {
    /// Truncates or creates the file at `path` and writes the envelope header
    ///
    /// # Returns
    ///
    /// * `Ok(XmlSitemapWriter)` - File opened and header written
    /// * `Err(OutputError)` - The path is not writable
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> XmlSitemapWriter<W> {
    /// Wraps a sink and writes the envelope header to it
    pub fn new(mut out: W) -> OutputResult<Self> {
        out.write_all(HEADER.as_bytes())?;
        out.flush()?;
        Ok(Self {
            out,
            entries: 0,
            closed: false,
        })
    }

    /// Returns the underlying sink
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Renders one `<url>` record with the location markup-escaped
fn render_entry(loc: &str) -> String {
    format!(
        "<url>\n  <loc>{}</loc>\n  <changefreq>{}</changefreq>\n  <priority>{}</priority>\n</url>\n",
        escape(loc),
        CHANGEFREQ,
        PRIORITY
    )
}

impl<W: Write + Send> SitemapWriter for XmlSitemapWriter<W> {
    fn append(&mut self, loc: &str) -> OutputResult<()> {
        if self.closed {
            return Err(OutputError::Closed);
        }

        // One write per record keeps every entry whole on disk.
        self.out.write_all(render_entry(loc).as_bytes())?;
        self.out.flush()?;
        self.entries += 1;
        Ok(())
    }

    fn close(&mut self) -> OutputResult<()> {
        if self.closed {
            return Err(OutputError::Closed);
        }

        self.out.write_all(FOOTER.as_bytes())?;
        self.out.flush()?;
        self.closed = true;
        Ok(())
    }

    fn entries(&self) -> usize {
        self.entries
    }
}
