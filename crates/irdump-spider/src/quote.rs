use crate::config::Config;
use crate::http::*;
use crate::SpiderError;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

// fetch
// ----------------------------------------------------------------------------

/// Best-effort market quote lookup keyed by ticker; every failure is `None`.
#[async_trait::async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch_quote(&self, ticker: &str) -> Option<Quote>;
}

/// Quotes from the Yahoo Finance v7 endpoint.
#[derive(Debug, Clone)]
pub struct YahooFinance {
    client: HttpClient,
}

impl YahooFinance {
    pub fn new(config: &Config) -> Result<Self, SpiderError> {
        let client = crate::std_client_build(&config.user_agent, config.page_timeout)?;
        Ok(Self { client })
    }

    async fn request(&self, ticker: &str) -> Result<QuoteResponse, reqwest::Error> {
        let url = format!("https://query1.finance.yahoo.com/v7/finance/quote?symbols={ticker}");
        trace!("fetching Yahoo Finance quote for [{ticker}]");
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[async_trait::async_trait]
impl QuoteSource for YahooFinance {
    async fn fetch_quote(&self, ticker: &str) -> Option<Quote> {
        if ticker.trim().is_empty() {
            return None;
        }

        match self.request(ticker).await {
            Ok(response) => {
                let quote = response.into_quote();
                if quote.is_none() {
                    warn!("no Yahoo Finance quote found for [{ticker}]");
                }
                quote
            }
            Err(err) => {
                warn!("failed to fetch Yahoo Finance quote for [{ticker}], error({err})");
                None
            }
        }
    }
}

/// Latest market figures for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub price: Option<f64>,
    pub market_cap: Option<f64>,
    pub currency: Option<String>,
}

// de
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse {
    quote_response: QuoteResult,
}

#[derive(Debug, Deserialize)]
struct QuoteResult {
    #[serde(default)]
    result: Vec<RawQuote>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuote {
    regular_market_price: Option<f64>,
    market_cap: Option<f64>,
    currency: Option<String>,
}

impl QuoteResponse {
    fn into_quote(self) -> Option<Quote> {
        self.quote_response.result.into_iter().next().map(|raw| Quote {
            price: raw.regular_market_price,
            market_cap: raw.market_cap,
            currency: raw.currency,
        })
    }
}
