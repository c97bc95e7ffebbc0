//! TradingView scanner client for fetching indicator snapshots
//!
//! No API key required for the public scanner endpoint.
//!
//! # Example
//! ```no_run
//! use maverick_book::tradingview::{IndicatorSource, ScannerClient};
//! use maverick_book::{Interval, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ScannerClient::new()?;
//!     let raw = client
//!         .fetch_indicators(&Symbol::new("CKBUSDT"), "BYBIT", "crypto", Interval::OneDay)
//!         .await?;
//!     println!("close = {:?}", raw.number("close"));
//!     Ok(())
//! }
//! ```

use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use super::types::{RawIndicators, ScanRequest, ScanResponse, DEFAULT_INDICATORS};
use crate::error::FetchError;
use crate::{Interval, Symbol};

/// Base URL for the scanner API
pub const SCANNER_API_BASE: &str = "https://scanner.tradingview.com";

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Anything that can produce raw indicator readings for a symbol
///
/// The screener fans out over this trait so it can run against the live
/// scanner or an in-memory source.
pub trait IndicatorSource: Send + Sync {
    fn fetch_indicators(
        &self,
        symbol: &Symbol,
        exchange: &str,
        screener: &str,
        interval: Interval,
    ) -> impl Future<Output = Result<RawIndicators, FetchError>> + Send;
}

/// Scanner API client
#[derive(Debug, Clone)]
pub struct ScannerClient {
    client: Client,
    base_url: String,
    indicators: Vec<&'static str>,
}

impl ScannerClient {
    /// Create a client with the default timeout
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(ScannerClient {
            client,
            base_url: SCANNER_API_BASE.to_string(),
            indicators: DEFAULT_INDICATORS.to_vec(),
        })
    }

    /// Point the client at another host (mirrors, local proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Indicators requested on every scan
    pub fn indicators(&self) -> &[&'static str] {
        &self.indicators
    }

    async fn scan(
        &self,
        symbol: &Symbol,
        exchange: &str,
        screener: &str,
        interval: Interval,
    ) -> Result<RawIndicators, FetchError> {
        let url = format!("{}/{}/scan", self.base_url, screener.to_lowercase());
        let ticker = symbol.ticker(exchange);
        let request = ScanRequest::new(vec![ticker.clone()], &self.indicators, interval);

        debug!("Scanning {} ({}) via {}", ticker, interval, url);

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ScanResponse = serde_json::from_str(&body)?;
        parse_scan_response(&ticker, &self.indicators, parsed)
    }
}

/// Pick the row for `ticker` out of a scan response
pub fn parse_scan_response(
    ticker: &str,
    indicators: &[&str],
    response: ScanResponse,
) -> Result<RawIndicators, FetchError> {
    response
        .data
        .iter()
        .find(|row| row.s.eq_ignore_ascii_case(ticker))
        .or_else(|| response.data.first())
        .map(|row| RawIndicators::from_row(indicators, row))
        .ok_or_else(|| FetchError::SymbolNotFound(ticker.to_string()))
}

impl IndicatorSource for ScannerClient {
    async fn fetch_indicators(
        &self,
        symbol: &Symbol,
        exchange: &str,
        screener: &str,
        interval: Interval,
    ) -> Result<RawIndicators, FetchError> {
        self.scan(symbol, exchange, screener, interval).await
    }
}
