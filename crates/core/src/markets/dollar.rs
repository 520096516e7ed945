//! Dollar types (oficial and blue) from Bluelytics.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;

use tradingdesk_market_data::{
    BluelyticsProvider, FallbackChain, Quote, ResultCache, SnapshotStore, SOURCE_FALLBACK,
};

const TTL: Duration = Duration::from_secs(300);
const SNAPSHOT_KEY: &str = "dollar";

fn static_fallback() -> Vec<Quote> {
    vec![
        Quote::new("USD/ARS Oficial", dec!(990.00), "ARS".into(), SOURCE_FALLBACK),
        Quote::new("USD/ARS Blue", dec!(1485.00), "ARS".into(), SOURCE_FALLBACK),
    ]
}

/// Dollar board service.
pub struct DollarService {
    chain: Arc<FallbackChain<Vec<Quote>>>,
    cache: ResultCache<Vec<Quote>>,
}

impl DollarService {
    pub fn new(store: Option<&Arc<SnapshotStore>>) -> Self {
        let chain = FallbackChain::new("dollar", static_fallback())
            .with_adapter(Arc::new(BluelyticsProvider::new()));

        let cache = match store {
            Some(store) => {
                ResultCache::with_store("dollar", TTL, Arc::clone(store), SNAPSHOT_KEY)
            }
            None => ResultCache::new("dollar", TTL),
        };

        Self {
            chain: Arc::new(chain),
            cache,
        }
    }

    /// Latest dollar rates. Never fails.
    pub async fn fetch(&self) -> Vec<Quote> {
        let chain = Arc::clone(&self.chain);
        self.cache
            .get_or_fetch(move || async move { chain.resolve().await })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_has_both_dollar_types() {
        let fallback = static_fallback();
        let symbols: Vec<_> = fallback.iter().map(|q| q.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["USD/ARS Oficial", "USD/ARS Blue"]);
        assert!(fallback.iter().all(|q| q.currency == "ARS"));
    }
}
