use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use tradingdesk_market_data::format::{format_index_quote, format_quote};
use tradingdesk_market_data::{DisplayQuote, NewsFeed, Quote};

use crate::main_lib::AppState;

/// One quote as served to the dashboard: normalized values plus the
/// display strings the widgets render verbatim.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDto {
    pub symbol: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<Decimal>,
    pub currency: String,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub display: DisplayQuote,
}

impl QuoteDto {
    fn from_quote(quote: &Quote) -> Self {
        Self::build(quote, format_quote(quote))
    }

    fn from_index_quote(quote: &Quote) -> Self {
        Self::build(quote, format_index_quote(quote))
    }

    fn build(quote: &Quote, display: DisplayQuote) -> Self {
        Self {
            symbol: quote.symbol.clone(),
            price: quote.price,
            change: quote.change,
            change_percent: quote.change_percent,
            currency: quote.currency.clone(),
            timestamp: quote.timestamp,
            source: quote.source.clone(),
            display,
        }
    }
}

fn board(quotes: &[Quote]) -> Vec<QuoteDto> {
    quotes.iter().map(QuoteDto::from_quote).collect()
}

async fn get_crypto(State(state): State<Arc<AppState>>) -> Json<Vec<QuoteDto>> {
    Json(board(&state.desk.crypto.fetch().await))
}

async fn get_equities(State(state): State<Arc<AppState>>) -> Json<Vec<QuoteDto>> {
    Json(board(&state.desk.equities.fetch().await))
}

async fn get_commodities(State(state): State<Arc<AppState>>) -> Json<Vec<QuoteDto>> {
    Json(board(&state.desk.commodities.fetch().await))
}

async fn get_dollar(State(state): State<Arc<AppState>>) -> Json<Vec<QuoteDto>> {
    Json(board(&state.desk.dollar.fetch().await))
}

async fn get_merval(State(state): State<Arc<AppState>>) -> Json<QuoteDto> {
    Json(QuoteDto::from_index_quote(&state.desk.merval.fetch().await))
}

async fn get_inflation(State(state): State<Arc<AppState>>) -> Json<QuoteDto> {
    Json(QuoteDto::from_quote(&state.desk.inflation.fetch().await))
}

async fn get_country_risk(State(state): State<Arc<AppState>>) -> Json<QuoteDto> {
    Json(QuoteDto::from_quote(&state.desk.country_risk.fetch().await))
}

async fn get_news(State(state): State<Arc<AppState>>) -> Json<NewsFeed> {
    Json(state.desk.news.fetch().await)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/crypto", get(get_crypto))
        .route("/equities", get(get_equities))
        .route("/commodities", get(get_commodities))
        .route("/dollar", get(get_dollar))
        .route("/merval", get(get_merval))
        .route("/inflation", get(get_inflation))
        .route("/country-risk", get(get_country_risk))
        .route("/news", get(get_news))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_dto_serializes_camel_case_with_display() {
        let quote = Quote::new("BTC/USD", dec!(43012.45), "USD".into(), "CoinGecko")
            .with_change_percent(dec!(1.2));
        let dto = QuoteDto::from_quote(&quote);
        let value = serde_json::to_value(&dto).unwrap();

        assert_eq!(value["symbol"], "BTC/USD");
        assert_eq!(value["changePercent"], 1.2);
        assert_eq!(value["source"], "CoinGecko");
        assert_eq!(value["display"]["price"], "$43,012.45");
        assert_eq!(value["display"]["changePercent"], "+1.20%");
    }

    #[test]
    fn test_index_dto_abbreviates_points() {
        let quote = Quote::new("MERVAL", dec!(2134567.25), "ARS".into(), "Yahoo")
            .with_change_percent(dec!(0.72));
        let dto = QuoteDto::from_index_quote(&quote);
        let value = serde_json::to_value(&dto).unwrap();

        assert_eq!(value["display"]["price"], "2.135K");
        assert_eq!(value["display"]["changePercent"], "+0.72%");
    }

    #[test]
    fn test_absent_change_renders_flat() {
        let quote = Quote::new("USD/ARS Oficial", dec!(990), "ARS".into(), "Bluelytics");
        let dto = QuoteDto::from_quote(&quote);
        let value = serde_json::to_value(&dto).unwrap();

        assert!(value.get("changePercent").is_none());
        assert_eq!(value["display"]["changePercent"], "0.00%");
    }
}
