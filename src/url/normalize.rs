use crate::{UrlError, UrlResult};
use url::Url;

/// Canonicalizes a URL string for scope checks and deduplication
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace and parse; reject if malformed or relative
/// 2. Accept only `http` and `https`
/// 3. Drop the fragment (everything after `#`)
/// 4. Serialize through `url`, which lowercases scheme and host, removes
///    default ports and gives an empty path a trailing `/`
///
/// Query strings are kept verbatim; two URLs that differ only in query are
/// different pages.
///
/// # Examples
///
/// ```
/// use site_collector::url::canonicalize_url;
///
/// let url = canonicalize_url("HTTP://Example.COM:80#top").unwrap();
/// assert_eq!(url, "http://example.com/");
/// ```
pub fn canonicalize_url(url_str: &str) -> UrlResult<String> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    url.set_fragment(None);

    Ok(url.into())
}
