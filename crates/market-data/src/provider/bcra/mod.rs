//! BCRA statistics source adapter.
//!
//! Provider for the macro series the dashboard tracks (monthly inflation,
//! country risk). The `estadisticas/v3.0/monetarias/{series}` endpoint
//! returns the series observations newest first; the adapter normalizes
//! the latest observation into a quote and derives the change from the
//! previous one.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use log::{debug, warn};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::FetchError;
use crate::models::Quote;
use crate::provider::SourceAdapter;

const BASE_URL: &str = "https://api.bcra.gob.ar/estadisticas/v3.0/monetarias";
const PROVIDER_ID: &str = "BCRA";
const TIMEOUT: Duration = Duration::from_secs(12);

/// Response from the series endpoint.
#[derive(Debug, Deserialize)]
struct SeriesResponse {
    #[serde(default)]
    results: Vec<SeriesPoint>,
}

#[derive(Debug, Deserialize)]
struct SeriesPoint {
    fecha: String,
    valor: Option<f64>,
}

/// BCRA statistics provider for one series.
pub struct BcraProvider {
    client: Client,
    series: u32,
    symbol: &'static str,
}

impl BcraProvider {
    /// Create a provider for the given series id.
    pub fn new(series: u32, symbol: &'static str) -> Self {
        let client = Client::builder()
            .timeout(TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            series,
            symbol,
        }
    }

    fn parse_point(&self, point: &SeriesPoint) -> Option<(NaiveDate, Decimal)> {
        let date = match NaiveDate::parse_from_str(&point.fecha, "%Y-%m-%d") {
            Ok(d) => d,
            Err(_) => {
                warn!("BCRA: unparseable date '{}' in series {}", point.fecha, self.series);
                return None;
            }
        };
        let value = point.valor.and_then(|v| Decimal::try_from(v).ok())?;
        Some((date, value))
    }
}

#[async_trait]
impl SourceAdapter<Quote> for BcraProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn timeout(&self) -> Duration {
        TIMEOUT
    }

    async fn fetch(&self) -> Result<Quote, FetchError> {
        let url = format!("{}/{}", BASE_URL, self.series);

        debug!("BCRA request for series {}", self.series);

        let response = self
            .client
            .get(&url)
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

        let body: SeriesResponse = response
            .json()
            .await
            .map_err(|e| FetchError::shape(PROVIDER_ID, format!("invalid JSON body: {}", e)))?;

        let mut points: Vec<(NaiveDate, Decimal)> = body
            .results
            .iter()
            .filter_map(|p| self.parse_point(p))
            .collect();

        if points.is_empty() {
            return Err(FetchError::shape(
                PROVIDER_ID,
                format!("series {} has no usable observations", self.series),
            ));
        }

        points.sort_by_key(|(date, _)| *date);

        let (latest_date, latest_value) = points[points.len() - 1];
        let timestamp = Utc.from_utc_datetime(&latest_date.and_hms_opt(0, 0, 0).unwrap_or_default());

        let mut quote = Quote::new(self.symbol, latest_value, "ARS".into(), PROVIDER_ID)
            .with_timestamp(timestamp);

        if points.len() >= 2 {
            let (_, previous) = points[points.len() - 2];
            quote = quote.with_change((latest_value - previous).round_dp(2));
            if !previous.is_zero() {
                let pct = (latest_value - previous) / previous * Decimal::from(100);
                quote = quote.with_change_percent(pct.round_dp(2));
            }
        }

        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_series_response_parsing() {
        let json = r#"{
            "status": 200,
            "metadata": {"resultset": {"count": 2}},
            "results": [
                {"idVariable": 27, "fecha": "2025-06-30", "valor": 1.6},
                {"idVariable": 27, "fecha": "2025-05-31", "valor": 1.5}
            ]
        }"#;

        let body: SeriesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.results.len(), 2);
        assert_eq!(body.results[0].fecha, "2025-06-30");
        assert_eq!(body.results[0].valor, Some(1.6));
    }

    #[test]
    fn test_parse_point_skips_bad_dates() {
        let provider = BcraProvider::new(27, "Inflación Mensual");

        let bad = SeriesPoint {
            fecha: "junio".to_string(),
            valor: Some(1.6),
        };
        assert!(provider.parse_point(&bad).is_none());

        let good = SeriesPoint {
            fecha: "2025-06-30".to_string(),
            valor: Some(1.6),
        };
        let (date, value) = provider.parse_point(&good).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
        assert_eq!(value, dec!(1.6));
    }

    #[test]
    fn test_parse_point_skips_missing_values() {
        let provider = BcraProvider::new(27, "Inflación Mensual");
        let point = SeriesPoint {
            fecha: "2025-06-30".to_string(),
            valor: None,
        };
        assert!(provider.parse_point(&point).is_none());
    }
}
