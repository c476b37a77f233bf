mod error;

/// Per-company persistence: the download ledger and the metadata record.
pub mod ledger;

/// Filesystem helpers shared by the ledger store, the downloader and the catalog.
pub mod fs;

/// Environment driven configuration.
pub mod config;

/// The fixed list of companies to scrape.
pub mod roster;

/// Bounded-timeout HTTP GET for IR pages and document files.
pub mod fetch;

/// Candidate document links; static HTML parsing and the dynamic-rendering fallback.
pub mod extract;

/// Single-company scrape pass.
pub mod scrape;

/// Runs a scrape pass for every company in a roster.
pub mod batch;

/// Injected side effect for newly downloaded files.
pub mod publish;

/// Market quotes collected from the Yahoo Finance API.
pub mod quote;

/// Read-only listing of scraped companies and files, used by the front end.
pub mod catalog;

pub(crate) mod tui;

pub use error::SpiderError;

/// Shortcut for required HTTP elements.
pub mod http {
    pub use reqwest::Client as HttpClient;
}

/// Build the standard HTTP client; every outbound request carries the configured user agent.
/// `timeout` bounds connecting and, unless a request sets its own, the whole request.
pub fn std_client_build(
    user_agent: &str,
    timeout: std::time::Duration,
) -> Result<http::HttpClient, SpiderError> {
    let client = reqwest::ClientBuilder::new()
        .user_agent(user_agent)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Formats the time elapsed since `time`, for log lines.
pub(crate) fn time_elapsed(time: std::time::Instant) -> String {
    format!("time elapsed: {:.2?}", time.elapsed())
}
