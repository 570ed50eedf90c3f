//! Listing-page URL building and link resolution
//!
//! Page URLs follow the fixed Kleinanzeigen pattern:
//!
//! - page 1: `{base}/s-{query}/{category}`
//! - page N: `{base}/Seite:{N}/s-{query}/{category}`

use url::Url;

use crate::config::CrawlerConfig;
use crate::utils::error::ParseError;

/// Builds listing-page URLs and resolves hrefs against the site origin
#[derive(Debug, Clone)]
pub struct PageUrlBuilder {
    base: Url,
    origin: String,
    category: String,
}

impl PageUrlBuilder {
    /// Create a builder for a site origin and category path segment
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidUrl` if `base_url` is not an absolute URL
    pub fn new(base_url: &str, category: &str) -> Result<Self, ParseError> {
        let base = Url::parse(base_url)
            .map_err(|e| ParseError::InvalidUrl(format!("{base_url}: {e}")))?;

        if base.cannot_be_a_base() {
            return Err(ParseError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            origin: base_url.trim_end_matches('/').to_string(),
            base,
            category: category.trim_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &CrawlerConfig) -> Result<Self, ParseError> {
        Self::new(&config.base_url, &config.category)
    }

    /// URL of result page `page` for an already normalized query
    ///
    /// The query is inserted verbatim; normalizing it (spaces to `-`) is the
    /// caller's job. Page 0 is treated as page 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use firechair::crawler::url::PageUrlBuilder;
    ///
    /// let urls = PageUrlBuilder::new("https://www.kleinanzeigen.de", "k0c305").unwrap();
    /// assert_eq!(
    ///     urls.build("honda-cbr-600f", 1),
    ///     "https://www.kleinanzeigen.de/s-honda-cbr-600f/k0c305"
    /// );
    /// assert_eq!(
    ///     urls.build("honda-cbr-600f", 3),
    ///     "https://www.kleinanzeigen.de/Seite:3/s-honda-cbr-600f/k0c305"
    /// );
    /// ```
    #[must_use]
    pub fn build(&self, query: &str, page: u32) -> String {
        if page <= 1 {
            format!("{}/s-{query}/{}", self.origin, self.category)
        } else {
            format!("{}/Seite:{page}/s-{query}/{}", self.origin, self.category)
        }
    }

    /// Resolve a possibly relative href against the site origin
    ///
    /// The fragment is dropped so in-page anchors do not produce distinct URLs.
    pub fn absolutize(&self, href: &str) -> Option<Url> {
        let mut resolved = self.base.join(href).ok()?;
        resolved.set_fragment(None);
        Some(resolved)
    }

    /// Whether a URL points at the configured site (same scheme, host and port)
    pub fn is_same_site(&self, url: &Url) -> bool {
        url.scheme() == self.base.scheme()
            && url.host_str() == self.base.host_str()
            && url.port_or_known_default() == self.base.port_or_known_default()
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }
}
