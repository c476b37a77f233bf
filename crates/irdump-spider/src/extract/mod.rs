/// Anchor hrefs ending in a document extension, from delivered HTML.
pub mod html;

/// Anchor hrefs from a headless-rendered page, for JavaScript-driven sites.
pub mod render;

pub use html::extract_links;
pub use render::{Render, Renderer};

use url::Url;

/// A candidate document link found on an IR page during one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    /// The href exactly as it appeared in the page.
    pub raw_href: String,
    /// `raw_href` resolved against the IR page URL.
    pub url: Url,
}

impl DiscoveredLink {
    /// Resolve `href` against `base`; `None` if it does not resolve to an http(s) URL.
    ///
    /// ```rust
    /// use irdump_spider::extract::DiscoveredLink;
    /// use url::Url;
    ///
    /// let base = Url::parse("https://ir.example.com/docs/").unwrap();
    /// let link = DiscoveredLink::resolve(&base, "/files/report.pdf").unwrap();
    /// assert_eq!(link.url.as_str(), "https://ir.example.com/files/report.pdf");
    /// ```
    pub fn resolve(base: &Url, href: &str) -> Option<Self> {
        let url = base.join(href.trim()).ok()?;
        match url.scheme() {
            "http" | "https" => Some(Self {
                raw_href: href.to_string(),
                url,
            }),
            _ => None,
        }
    }

    /// Local filename: the final path segment of the resolved URL, if it is not empty.
    pub fn filename(&self) -> Option<&str> {
        self.url
            .path_segments()
            .and_then(|segments| segments.last())
            .filter(|segment| !segment.is_empty())
    }
}
