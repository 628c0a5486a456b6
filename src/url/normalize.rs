use crate::url::{is_crawlable_scheme, Resolution, ResolvedUrl, SiteRoot};
use crate::{UrlError, UrlResult};
use url::Url;

/// Resolves a raw href found on a page into a crawl decision
///
/// # Resolution Steps
///
/// 1. Trim the href and resolve it against the current page's URL
///    (absolute hrefs replace the base entirely)
/// 2. Non-http(s) schemes (`mailto:`, `javascript:`, ...) → `Skipped`
/// 3. Host (or explicit port) differing from the site root → `OffSite`
/// 4. Drop the fragment and compute the canonical key
///
/// # Arguments
///
/// * `current` - The resolved URL of the page the href was found on
/// * `href` - The raw href attribute value
/// * `root` - The crawl's site root
///
/// # Returns
///
/// * `Ok(Resolution)` - What the crawler should do with the link
/// * `Err(UrlError::Parse)` - The href could not be parsed
///
/// # Examples
///
/// ```
/// use sitegraph::url::{resolve, Resolution, SiteRoot};
///
/// let root = SiteRoot::from_seed("https://example.com/").unwrap();
/// let current = root.url().join("/docs/intro").unwrap();
///
/// match resolve(&current, "setup#install", &root).unwrap() {
///     Resolution::Page(page) => assert_eq!(page.key, "/docs/setup"),
///     other => panic!("unexpected {:?}", other),
/// }
/// ```
pub fn resolve(current: &Url, href: &str, root: &SiteRoot) -> UrlResult<Resolution> {
    let href = href.trim();
    let mut url = current.join(href).map_err(|source| UrlError::Parse {
        url: href.to_string(),
        source,
    })?;

    if !is_crawlable_scheme(url.scheme()) {
        return Ok(Resolution::Skipped {
            scheme: url.scheme().to_string(),
        });
    }

    if !root.contains(&url) {
        return Ok(Resolution::OffSite { url });
    }

    url.set_fragment(None);
    let key = canonical_key(&url);

    Ok(Resolution::Page(ResolvedUrl { key, url }))
}

/// Computes the host-relative dedup key for a URL
///
/// The key is the path (empty becomes `/`) followed by the query string when
/// one is present. All whitespace is removed so textual variants of the same
/// path collapse to one key.
pub fn canonical_key(url: &Url) -> String {
    let mut key = url.path().to_string();

    if let Some(query) = url.query().filter(|q| !q.is_empty()) {
        key.push('?');
        key.push_str(query);
    }

    key.retain(|c| !c.is_whitespace());

    if key.is_empty() {
        return "/".to_string();
    }
    if !key.starts_with('/') {
        key.insert(0, '/');
    }

    key
}
