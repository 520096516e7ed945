//! Bluelytics source adapter.
//!
//! Provider for the Argentine dollar types (oficial and blue). The
//! `/v2/latest` endpoint needs no key and publishes buy/sell pairs; the
//! normalized quote carries the sell rate, which is the headline number
//! the dashboard renders.
//! API documentation: https://bluelytics.com.ar/#!/api

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::FetchError;
use crate::models::Quote;
use crate::provider::SourceAdapter;

const URL: &str = "https://api.bluelytics.com.ar/v2/latest";
const PROVIDER_ID: &str = "Bluelytics";
const TIMEOUT: Duration = Duration::from_secs(8);

/// Response from `/v2/latest`.
#[derive(Debug, Deserialize)]
struct LatestResponse {
    oficial: RateEntry,
    blue: RateEntry,
    last_update: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RateEntry {
    value_buy: Option<f64>,
    value_sell: Option<f64>,
}

/// Bluelytics dollar-rate provider.
pub struct BluelyticsProvider {
    client: Client,
}

impl BluelyticsProvider {
    /// Create a new provider.
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    fn entry_to_quote(
        &self,
        entry: &RateEntry,
        symbol: &str,
        observed_at: Option<DateTime<Utc>>,
    ) -> Result<Quote, FetchError> {
        let sell = entry.value_sell.ok_or_else(|| {
            FetchError::shape(PROVIDER_ID, format!("no sell value for '{}'", symbol))
        })?;
        let price = Decimal::try_from(sell)
            .map_err(|_| FetchError::shape(PROVIDER_ID, format!("invalid rate: {}", sell)))?;

        let mut quote = Quote::new(symbol, price.round_dp(2), "ARS".into(), PROVIDER_ID);
        if let Some(buy) = entry.value_buy.and_then(|v| Decimal::try_from(v).ok()) {
            // spread between the published buy and sell rates
            quote = quote.with_change((price - buy).round_dp(2));
        }
        if let Some(ts) = observed_at {
            quote = quote.with_timestamp(ts);
        }
        Ok(quote)
    }
}

impl Default for BluelyticsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter<Vec<Quote>> for BluelyticsProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn timeout(&self) -> Duration {
        TIMEOUT
    }

    async fn fetch(&self) -> Result<Vec<Quote>, FetchError> {
        debug!("Bluelytics request");

        let response = self
            .client
            .get(URL)
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

        let body: LatestResponse = response
            .json()
            .await
            .map_err(|e| FetchError::shape(PROVIDER_ID, format!("invalid JSON body: {}", e)))?;

        let observed_at = body
            .last_update
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(vec![
            self.entry_to_quote(&body.oficial, "USD/ARS Oficial", observed_at)?,
            self.entry_to_quote(&body.blue, "USD/ARS Blue", observed_at)?,
        ])
    }
}
