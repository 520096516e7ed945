//! Yahoo Finance source adapter.
//!
//! Fallback provider for equities and commodities, and the primary source
//! for the MERVAL index (symbol `^MERV`). Uses the `v7/finance/quote`
//! endpoint, which answers any number of symbols in one request. Yahoo
//! rejects requests without a browser-looking user agent.
//!
//! The browser original reached this endpoint through a CORS relay; the
//! server-side pipeline calls the origin directly.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::FetchError;
use crate::models::Quote;
use crate::provider::fmp::SymbolSpec;
use crate::provider::SourceAdapter;

const BASE_URL: &str = "https://query1.finance.yahoo.com/v7/finance/quote";
const PROVIDER_ID: &str = "Yahoo";
const TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0";

#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    #[serde(rename = "quoteResponse")]
    quote_response: QuoteResponse,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(default)]
    result: Vec<YahooQuote>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooQuote {
    symbol: String,
    regular_market_price: Option<f64>,
    regular_market_change: Option<f64>,
    regular_market_change_percent: Option<f64>,
    currency: Option<String>,
}

/// Yahoo Finance provider.
pub struct YahooProvider {
    client: Client,
    symbols: Vec<SymbolSpec>,
}

impl YahooProvider {
    /// Create a provider for the given symbol list.
    pub fn new(symbols: Vec<SymbolSpec>) -> Self {
        let client = Client::builder()
            .timeout(TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, symbols }
    }

    /// Create a provider for a single symbol (index quotes).
    pub fn single(ticker: &'static str, symbol: &'static str) -> Self {
        Self::new(vec![SymbolSpec { ticker, symbol }])
    }

    async fn fetch_all(&self) -> Result<Vec<Quote>, FetchError> {
        let tickers = self
            .symbols
            .iter()
            .map(|s| s.ticker)
            .collect::<Vec<_>>()
            .join(",");

        debug!("Yahoo request for {}", tickers);

        let response = self
            .client
            .get(BASE_URL)
            .query(&[("symbols", tickers.as_str())])
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(PROVIDER_ID, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Network {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let envelope: QuoteEnvelope = response
            .json()
            .await
            .map_err(|e| FetchError::shape(PROVIDER_ID, format!("invalid JSON body: {}", e)))?;

        if let Some(error) = envelope.quote_response.error {
            return Err(FetchError::shape(
                PROVIDER_ID,
                format!("error in envelope: {}", error),
            ));
        }

        let results = envelope.quote_response.result;
        if results.is_empty() {
            return Err(FetchError::shape(PROVIDER_ID, "empty result array"));
        }

        let mut quotes = Vec::with_capacity(self.symbols.len());
        for spec in &self.symbols {
            let item = results
                .iter()
                .find(|q| q.symbol == spec.ticker)
                .ok_or_else(|| {
                    FetchError::shape(PROVIDER_ID, format!("missing symbol '{}'", spec.ticker))
                })?;

            let raw_price = item.regular_market_price.ok_or_else(|| {
                FetchError::shape(PROVIDER_ID, format!("no market price for '{}'", spec.ticker))
            })?;
            let price = Decimal::try_from(raw_price).map_err(|_| {
                FetchError::shape(PROVIDER_ID, format!("invalid price: {}", raw_price))
            })?;

            let currency = match item.currency.as_deref() {
                Some("ARS") => "ARS",
                _ => "USD",
            };

            let mut quote = Quote::new(spec.symbol, price.round_dp(2), currency.into(), PROVIDER_ID);
            if let Some(change) = item
                .regular_market_change
                .and_then(|v| Decimal::try_from(v).ok())
            {
                quote = quote.with_change(change.round_dp(2));
            }
            if let Some(pct) = item
                .regular_market_change_percent
                .and_then(|v| Decimal::try_from(v).ok())
            {
                quote = quote.with_change_percent(pct.round_dp(2));
            }
            quotes.push(quote);
        }

        Ok(quotes)
    }
}

#[async_trait]
impl SourceAdapter<Vec<Quote>> for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn timeout(&self) -> Duration {
        TIMEOUT
    }

    async fn fetch(&self) -> Result<Vec<Quote>, FetchError> {
        self.fetch_all().await
    }
}

/// Single-quote shape, used for index chains.
#[async_trait]
impl SourceAdapter<Quote> for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn timeout(&self) -> Duration {
        TIMEOUT
    }

    async fn fetch(&self) -> Result<Quote, FetchError> {
        let mut quotes = self.fetch_all().await?;
        if quotes.is_empty() {
            return Err(FetchError::shape(PROVIDER_ID, "empty result array"));
        }
        Ok(quotes.remove(0))
    }
}
