use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SpiderError {
    /// The IR page could not be retrieved.
    #[error("failed to fetch page {url}: {reason}")]
    PageFetch { url: String, reason: String },

    /// Neither extractor found a candidate link on the IR page.
    #[error("no document links found on {url}")]
    NoLinksFound { url: String },

    /// One candidate file could not be retrieved.
    #[error("failed to download {url}: {reason}")]
    FileDownload { url: String, reason: String },

    /// A persisted ledger exists but cannot be parsed. Never reset silently.
    #[error("corrupt ledger at {path}: {source}")]
    LedgerCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("headless render of {url} failed: {reason}")]
    Render { url: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("io error")]
    Io(#[from] std::io::Error),

    #[error("http client error")]
    Http(#[from] reqwest::Error),

    #[error("json error")]
    Json(#[from] serde_json::Error),
}
