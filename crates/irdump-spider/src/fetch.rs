use crate::config::Config;
use crate::http::*;
use crate::SpiderError;
use std::time::Duration;
use tracing::{debug, trace};

/// Page and file retrieval, one GET per call.
///
/// Implementations report every network, timeout or status failure as an `Err`; callers
/// decide whether it is fatal.
#[async_trait::async_trait]
pub trait Fetch: Send + Sync {
    /// GET `url` and decode the body as text, substituting replacement characters for
    /// invalid UTF-8.
    async fn fetch_page(&self, url: &str) -> Result<String, SpiderError>;

    /// GET `url` and return the complete body. Nothing is returned until the whole body
    /// has arrived.
    async fn fetch_binary(&self, url: &str) -> Result<Vec<u8>, SpiderError>;
}

/// [`Fetch`] over a shared [`reqwest`] client carrying the configured user agent.
///
/// Pages get the short page timeout; documents get the download timeout, since an annual
/// report archive can take minutes on a slow link.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: HttpClient,
    page_timeout: Duration,
    download_timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self, SpiderError> {
        let client = crate::std_client_build(&config.user_agent, config.page_timeout)?;
        Ok(Self {
            client,
            page_timeout: config.page_timeout,
            download_timeout: config.download_timeout,
        })
    }

    async fn get(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, reqwest::Error> {
        trace!("GET {url}");
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait::async_trait]
impl Fetch for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, SpiderError> {
        let body = self
            .get(url, self.page_timeout)
            .await
            .map_err(|err| SpiderError::PageFetch {
                url: url.to_string(),
                reason: err.to_string(),
            })?;
        let html = String::from_utf8_lossy(&body).into_owned();
        debug!("downloaded {} bytes from {url}", html.len());
        Ok(html)
    }

    async fn fetch_binary(&self, url: &str) -> Result<Vec<u8>, SpiderError> {
        let body = self
            .get(url, self.download_timeout)
            .await
            .map_err(|err| SpiderError::FileDownload {
                url: url.to_string(),
                reason: err.to_string(),
            })?;
        trace!("received {} bytes from {url}", body.len());
        Ok(body)
    }
}
