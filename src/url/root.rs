use crate::url::is_crawlable_scheme;
use crate::{UrlError, UrlResult};
use url::{ParseError, Url};

/// The fixed origin a crawl is confined to
///
/// The site root is established once from the seed URL, before traversal
/// begins, and is handed to every resolution call. Links are kept only when
/// their host matches it, including any port written explicitly. The scheme
/// is not compared, so `http` and `https` links on the same host both belong
/// to the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRoot {
    origin: Url,
}

impl SiteRoot {
    /// Establishes the site root from a seed URL
    ///
    /// # Arguments
    ///
    /// * `seed` - An absolute http(s) URL
    ///
    /// # Returns
    ///
    /// * `Ok(SiteRoot)` - The seed's origin with path `/`
    /// * `Err(UrlError::RootUndetermined)` - The seed is relative or has no host
    /// * `Err(UrlError::UnsupportedScheme)` - The seed is not http or https
    /// * `Err(UrlError::Parse)` - The seed is malformed
    ///
    /// # Examples
    ///
    /// ```
    /// use sitegraph::url::SiteRoot;
    ///
    /// let root = SiteRoot::from_seed("https://example.com/docs/intro").unwrap();
    /// assert_eq!(root.url().as_str(), "https://example.com/");
    /// assert!(SiteRoot::from_seed("/docs/intro").is_err());
    /// ```
    pub fn from_seed(seed: &str) -> UrlResult<Self> {
        let seed = seed.trim();
        let mut origin = match Url::parse(seed) {
            Ok(url) => url,
            Err(ParseError::RelativeUrlWithoutBase) => {
                return Err(UrlError::RootUndetermined {
                    url: seed.to_string(),
                })
            }
            Err(source) => {
                return Err(UrlError::Parse {
                    url: seed.to_string(),
                    source,
                })
            }
        };

        if !is_crawlable_scheme(origin.scheme()) {
            return Err(UrlError::UnsupportedScheme {
                url: seed.to_string(),
                scheme: origin.scheme().to_string(),
            });
        }

        if origin.host_str().is_none() {
            return Err(UrlError::RootUndetermined {
                url: seed.to_string(),
            });
        }

        origin.set_path("/");
        origin.set_query(None);
        origin.set_fragment(None);

        Ok(Self { origin })
    }

    /// The root URL: scheme, host and port with path `/`
    pub fn url(&self) -> &Url {
        &self.origin
    }

    /// Returns true if `url` lives on this site
    ///
    /// `Url::port` is `None` for a scheme's default port, so only ports
    /// written explicitly take part in the comparison.
    pub fn contains(&self, url: &Url) -> bool {
        url.host_str() == self.origin.host_str() && url.port() == self.origin.port()
    }
}
