//! CoinGecko source adapter.
//!
//! Primary crypto provider. Uses the `/simple/price` endpoint, which
//! returns every requested coin in one request together with its 24h
//! change. No API key required on the public tier.
//! API documentation: https://www.coingecko.com/api/documentation

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::FetchError;
use crate::models::Quote;
use crate::provider::SourceAdapter;

const BASE_URL: &str = "https://api.coingecko.com/api/v3";
const PROVIDER_ID: &str = "CoinGecko";
const TIMEOUT: Duration = Duration::from_secs(8);

/// One entry of the `/simple/price` response, keyed by coin id.
#[derive(Debug, Deserialize)]
struct CoinPrice {
    usd: Option<f64>,
    #[serde(rename = "usd_24h_change")]
    usd_24h_change: Option<f64>,
}

/// Mapping from a CoinGecko coin id to the dashboard symbol.
#[derive(Clone, Copy, Debug)]
pub struct CoinSpec {
    /// CoinGecko id, e.g. "bitcoin"
    pub id: &'static str,
    /// Normalized symbol, e.g. "BTC/USD"
    pub symbol: &'static str,
}

/// CoinGecko crypto provider.
pub struct CoinGeckoProvider {
    client: Client,
    coins: Vec<CoinSpec>,
}

impl CoinGeckoProvider {
    /// Create a provider for the given coin list.
    pub fn new(coins: Vec<CoinSpec>) -> Self {
        let client = Client::builder()
            .timeout(TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, coins }
    }

    fn ids_param(&self) -> String {
        self.coins
            .iter()
            .map(|c| c.id)
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[async_trait]
impl SourceAdapter<Vec<Quote>> for CoinGeckoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn timeout(&self) -> Duration {
        TIMEOUT
    }

    async fn fetch(&self) -> Result<Vec<Quote>, FetchError> {
        let url = format!("{}/simple/price", BASE_URL);
        let ids = self.ids_param();

        debug!("CoinGecko request for ids: {}", ids);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("ids", ids.as_str()),
                ("vs_currencies", "usd"),
                ("include_24hr_change", "true"),
            ])
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

        let body: HashMap<String, CoinPrice> = response
            .json()
            .await
            .map_err(|e| FetchError::shape(PROVIDER_ID, format!("invalid JSON body: {}", e)))?;

        let mut quotes = Vec::with_capacity(self.coins.len());
        for coin in &self.coins {
            let entry = body
                .get(coin.id)
                .ok_or_else(|| FetchError::shape(PROVIDER_ID, format!("missing coin '{}'", coin.id)))?;

            let usd = entry
                .usd
                .ok_or_else(|| FetchError::shape(PROVIDER_ID, format!("no usd price for '{}'", coin.id)))?;
            let price = Decimal::try_from(usd)
                .map_err(|_| FetchError::shape(PROVIDER_ID, format!("invalid price: {}", usd)))?;

            let mut quote = Quote::new(coin.symbol, price, "USD".into(), PROVIDER_ID);
            if let Some(change) = entry.usd_24h_change.and_then(|v| Decimal::try_from(v).ok()) {
                quote = quote.with_change_percent(change.round_dp(2));
            }
            quotes.push(quote);
        }

        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_provider_id() {
        let provider = CoinGeckoProvider::new(vec![]);
        assert_eq!(SourceAdapter::<Vec<Quote>>::id(&provider), "CoinGecko");
    }

    #[test]
    fn test_ids_param_joins_coins() {
        let provider = CoinGeckoProvider::new(vec![
            CoinSpec { id: "bitcoin", symbol: "BTC/USD" },
            CoinSpec { id: "ethereum", symbol: "ETH/USD" },
        ]);
        assert_eq!(provider.ids_param(), "bitcoin,ethereum");
    }

    #[test]
    fn test_price_response_parsing() {
        let json = r#"{
            "bitcoin": {"usd": 43000.12, "usd_24h_change": 1.23},
            "ethereum": {"usd": 2280.5, "usd_24h_change": -0.8}
        }"#;

        let body: HashMap<String, CoinPrice> = serde_json::from_str(json).unwrap();
        assert_eq!(body["bitcoin"].usd, Some(43000.12));
        assert_eq!(body["ethereum"].usd_24h_change, Some(-0.8));
    }

    #[test]
    fn test_price_response_missing_change() {
        let json = r#"{"bitcoin": {"usd": 43000.0}}"#;

        let body: HashMap<String, CoinPrice> = serde_json::from_str(json).unwrap();
        assert_eq!(body["bitcoin"].usd, Some(43000.0));
        assert!(body["bitcoin"].usd_24h_change.is_none());
    }

    #[test]
    fn test_change_rounding() {
        let change = Decimal::try_from(1.2345678).unwrap().round_dp(2);
        assert_eq!(change, dec!(1.23));
    }
}
