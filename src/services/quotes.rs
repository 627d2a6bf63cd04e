use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::models::quote::{round2, Quote};
use crate::services::market_clock::MarketClock;

const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Price lookup seam. The engine only ever sees a `Quote`; every failure mode
/// (market closed, no data, transport error, timeout) collapses into
/// `Unavailable` here.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch(&self, symbol: &str) -> Quote;
}

/// Latest daily close from the Yahoo Finance v8 chart API, gated on market
/// hours so we never hammer the provider while the exchange is closed.
#[derive(Clone)]
pub struct YahooQuoteSource {
    http: Client,
    base_url: String,
    clock: MarketClock,
}

impl YahooQuoteSource {
    pub fn new(clock: MarketClock, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            base_url: YAHOO_BASE_URL.to_string(),
            clock,
        }
    }
}

#[async_trait]
impl QuoteSource for YahooQuoteSource {
    async fn fetch(&self, symbol: &str) -> Quote {
        if !self.clock.is_open() {
            tracing::debug!(symbol, "market closed, skipping quote fetch");
            return Quote::Unavailable;
        }

        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let res = self
            .http
            .get(&url)
            .query(&[("range", "1d"), ("interval", "1d")])
            .send()
            .await;

        let res = match res {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(symbol, error = %e, "quote fetch failed");
                return Quote::Unavailable;
            }
        };

        if !res.status().is_success() {
            tracing::warn!(symbol, status = %res.status(), "quote fetch rejected");
            return Quote::Unavailable;
        }

        let body = match res.json::<ChartResponse>().await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(symbol, error = %e, "quote response unreadable");
                return Quote::Unavailable;
            }
        };

        match latest_close(&body) {
            Some(price) => Quote::Price(round2(price)),
            None => {
                tracing::warn!(symbol, "no daily close published");
                Quote::Unavailable
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteBars>,
}

#[derive(Debug, Deserialize)]
struct QuoteBars {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Last non-null close of the most recent daily bar, if any.
fn latest_close(body: &ChartResponse) -> Option<f64> {
    body.chart
        .result
        .as_ref()?
        .first()?
        .indicators
        .quote
        .first()?
        .close
        .iter()
        .rev()
        .find_map(|c| *c)
}
