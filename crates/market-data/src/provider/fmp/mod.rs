//! Financial Modeling Prep source adapter.
//!
//! Primary provider for equities and commodities. Uses the `/api/v3/quote`
//! endpoint with a comma-joined symbol list. Requires an API key; the free
//! tier answers throttling with a 200 status and an "Error Message" body,
//! which is mapped to `RateLimited` here.
//! API documentation: https://site.financialmodelingprep.com/developer/docs

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::FetchError;
use crate::models::Quote;
use crate::provider::SourceAdapter;

const BASE_URL: &str = "https://financialmodelingprep.com/api/v3";
const PROVIDER_ID: &str = "FMP";
const TIMEOUT: Duration = Duration::from_secs(10);

/// One entry of the `/quote` response array.
#[derive(Debug, Deserialize)]
struct FmpQuote {
    symbol: String,
    price: Option<f64>,
    change: Option<f64>,
    #[serde(rename = "changesPercentage")]
    changes_percentage: Option<f64>,
}

/// Error body FMP returns with a 200 status.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

/// Mapping from a provider ticker to the dashboard symbol.
#[derive(Clone, Copy, Debug)]
pub struct SymbolSpec {
    /// Provider ticker, e.g. "GCUSD" or "YPF"
    pub ticker: &'static str,
    /// Normalized symbol, e.g. "Oro" or "YPF"
    pub symbol: &'static str,
}

/// Financial Modeling Prep provider.
pub struct FmpProvider {
    client: Client,
    api_key: String,
    symbols: Vec<SymbolSpec>,
}

impl FmpProvider {
    /// Create a provider with the given API key and symbol list.
    pub fn new(api_key: String, symbols: Vec<SymbolSpec>) -> Self {
        let client = Client::builder()
            .timeout(TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            symbols,
        }
    }

    /// Classify a 200-status error body: throttling messages become
    /// `RateLimited`, anything else is an unexpected shape.
    fn classify_error_body(&self, body: &str) -> FetchError {
        if let Ok(err) = serde_json::from_str::<ErrorResponse>(body) {
            if let Some(message) = err.error_message {
                if message.to_lowercase().contains("limit") {
                    return FetchError::RateLimited {
                        provider: PROVIDER_ID.to_string(),
                    };
                }
                return FetchError::shape(PROVIDER_ID, message);
            }
        }
        FetchError::shape(PROVIDER_ID, "unparseable body")
    }
}

#[async_trait]
impl SourceAdapter<Vec<Quote>> for FmpProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn timeout(&self) -> Duration {
        TIMEOUT
    }

    async fn fetch(&self) -> Result<Vec<Quote>, FetchError> {
        let tickers = self
            .symbols
            .iter()
            .map(|s| s.ticker)
            .collect::<Vec<_>>()
            .join(",");
        let url = format!("{}/quote/{}", BASE_URL, tickers);

        debug!("FMP request for {}", tickers);

        let response = self
            .client
            .get(&url)
            .query(&[("apikey", self.api_key.as_str())])
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

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(PROVIDER_ID, e))?;

        let items: Vec<FmpQuote> = match serde_json::from_str(&text) {
            Ok(items) => items,
            Err(_) => return Err(self.classify_error_body(&text)),
        };

        if items.is_empty() {
            return Err(FetchError::shape(PROVIDER_ID, "empty quote array"));
        }

        let mut quotes = Vec::with_capacity(self.symbols.len());
        for spec in &self.symbols {
            let item = items
                .iter()
                .find(|q| q.symbol == spec.ticker)
                .ok_or_else(|| {
                    FetchError::shape(PROVIDER_ID, format!("missing symbol '{}'", spec.ticker))
                })?;

            let raw_price = item.price.ok_or_else(|| {
                FetchError::shape(PROVIDER_ID, format!("no price for '{}'", spec.ticker))
            })?;
            let price = Decimal::try_from(raw_price).map_err(|_| {
                FetchError::shape(PROVIDER_ID, format!("invalid price: {}", raw_price))
            })?;

            let mut quote = Quote::new(spec.symbol, price, "USD".into(), PROVIDER_ID);
            if let Some(change) = item.change.and_then(|v| Decimal::try_from(v).ok()) {
                quote = quote.with_change(change.round_dp(2));
            }
            if let Some(pct) = item
                .changes_percentage
                .and_then(|v| Decimal::try_from(v).ok())
            {
                quote = quote.with_change_percent(pct.round_dp(2));
            }
            quotes.push(quote);
        }

        Ok(quotes)
    }
}
