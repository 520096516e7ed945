//! CoinCap source adapter.
//!
//! Secondary crypto provider, tried when CoinGecko fails. Uses the
//! `/v2/assets` endpoint, which reports prices as decimal strings.
//! API documentation: https://docs.coincap.io

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::FetchError;
use crate::models::Quote;
use crate::provider::coingecko::CoinSpec;
use crate::provider::SourceAdapter;

const BASE_URL: &str = "https://api.coincap.io/v2";
const PROVIDER_ID: &str = "CoinCap";
const TIMEOUT: Duration = Duration::from_secs(8);

/// Response from `/v2/assets`.
#[derive(Debug, Deserialize)]
struct AssetsResponse {
    data: Vec<AssetItem>,
}

/// One asset entry. CoinCap serializes all numbers as strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetItem {
    id: String,
    price_usd: String,
    change_percent24_hr: Option<String>,
}

/// CoinCap crypto provider.
///
/// Reuses the CoinGecko coin specs: both providers key assets by the same
/// lowercase ids ("bitcoin", "ethereum").
pub struct CoinCapProvider {
    client: Client,
    coins: Vec<CoinSpec>,
}

impl CoinCapProvider {
    /// Create a provider for the given coin list.
    pub fn new(coins: Vec<CoinSpec>) -> Self {
        let client = Client::builder()
            .timeout(TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, coins }
    }

    fn parse_decimal(&self, raw: &str, what: &str) -> Result<Decimal, FetchError> {
        Decimal::from_str(raw)
            .map_err(|_| FetchError::shape(PROVIDER_ID, format!("invalid {}: '{}'", what, raw)))
    }
}

#[async_trait]
impl SourceAdapter<Vec<Quote>> for CoinCapProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn timeout(&self) -> Duration {
        TIMEOUT
    }

    async fn fetch(&self) -> Result<Vec<Quote>, FetchError> {
        let url = format!("{}/assets", BASE_URL);
        let ids = self
            .coins
            .iter()
            .map(|c| c.id)
            .collect::<Vec<_>>()
            .join(",");

        debug!("CoinCap request for ids: {}", ids);

        let response = self
            .client
            .get(&url)
            .query(&[("ids", ids.as_str())])
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

        let body: AssetsResponse = response
            .json()
            .await
            .map_err(|e| FetchError::shape(PROVIDER_ID, format!("invalid JSON body: {}", e)))?;

        let mut quotes = Vec::with_capacity(self.coins.len());
        for coin in &self.coins {
            let item = body
                .data
                .iter()
                .find(|a| a.id == coin.id)
                .ok_or_else(|| FetchError::shape(PROVIDER_ID, format!("missing asset '{}'", coin.id)))?;

            let price = self.parse_decimal(&item.price_usd, "price")?;

            let mut quote = Quote::new(coin.symbol, price.round_dp(2), "USD".into(), PROVIDER_ID);
            if let Some(raw) = &item.change_percent24_hr {
                if let Ok(change) = Decimal::from_str(raw) {
                    quote = quote.with_change_percent(change.round_dp(2));
                }
            }
            quotes.push(quote);
        }

        Ok(quotes)
    }
}
