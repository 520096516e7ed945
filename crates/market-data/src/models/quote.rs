use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::Currency;

/// Normalized market data quote.
///
/// Every source adapter maps its provider's response schema into this shape;
/// nothing downstream of the adapter layer knows provider field names.
/// `price` is always present and finite by construction (`Decimal` has no
/// NaN); `change` and `change_percent` may be absent when the provider does
/// not publish them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Quote {
    /// Instrument identifier (e.g. "BTC/USD", "MERVAL")
    pub symbol: String,

    /// Current value in its native unit
    pub price: Decimal,

    /// Absolute change over the reference period (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<Decimal>,

    /// Percentage change over the reference period (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<Decimal>,

    /// Quote currency
    pub currency: String,

    /// When the value was observed or fetched
    pub timestamp: DateTime<Utc>,

    /// Label of the adapter that produced the value ("fallback" for the
    /// static literal)
    pub source: String,
}

impl Quote {
    /// Create a new quote with minimal required fields.
    pub fn new(
        symbol: impl Into<String>,
        price: Decimal,
        currency: Currency,
        source: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            change: None,
            change_percent: None,
            currency: currency.into_owned(),
            timestamp: Utc::now(),
            source: source.into(),
        }
    }

    /// Attach the absolute change over the reference period.
    pub fn with_change(mut self, change: Decimal) -> Self {
        self.change = Some(change);
        self
    }

    /// Attach the percentage change over the reference period.
    pub fn with_change_percent(mut self, change_percent: Decimal) -> Self {
        self.change_percent = Some(change_percent);
        self
    }

    /// Override the observation timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::borrow::Cow;

    #[test]
    fn test_quote_new() {
        let quote = Quote::new("BTC/USD", dec!(43000.50), Cow::Borrowed("USD"), "CoinGecko");
        assert_eq!(quote.symbol, "BTC/USD");
        assert_eq!(quote.price, dec!(43000.50));
        assert_eq!(quote.currency, "USD");
        assert_eq!(quote.source, "CoinGecko");
        assert!(quote.change.is_none());
        assert!(quote.change_percent.is_none());
    }

    #[test]
    fn test_quote_builders() {
        let quote = Quote::new("MERVAL", dec!(2134567), Cow::Borrowed("ARS"), "Yahoo")
            .with_change(dec!(15230))
            .with_change_percent(dec!(0.72));
        assert_eq!(quote.change, Some(dec!(15230)));
        assert_eq!(quote.change_percent, Some(dec!(0.72)));
    }

    #[test]
    fn test_optional_fields_not_serialized() {
        let quote = Quote::new("USD/ARS Blue", dec!(1485), Cow::Borrowed("ARS"), "Bluelytics");
        let json = serde_json::to_string(&quote).unwrap();
        assert!(!json.contains("change"));
    }
}
