//! MERVAL index quote from Yahoo (`^MERV`).

use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;

use tradingdesk_market_data::{
    FallbackChain, Quote, ResultCache, SnapshotStore, YahooProvider, SOURCE_FALLBACK,
};

const TTL: Duration = Duration::from_secs(120);
const SNAPSHOT_KEY: &str = "merval";

fn static_fallback() -> Quote {
    Quote::new("MERVAL", dec!(2134567.25), "ARS".into(), SOURCE_FALLBACK)
        .with_change_percent(dec!(0.72))
}

/// MERVAL index service.
pub struct MervalService {
    chain: Arc<FallbackChain<Quote>>,
    cache: ResultCache<Quote>,
}

impl MervalService {
    pub fn new(store: Option<&Arc<SnapshotStore>>) -> Self {
        let chain = FallbackChain::new("merval", static_fallback())
            .with_adapter(Arc::new(YahooProvider::single("^MERV", "MERVAL")));

        let cache = match store {
            Some(store) => {
                ResultCache::with_store("merval", TTL, Arc::clone(store), SNAPSHOT_KEY)
            }
            None => ResultCache::new("merval", TTL),
        };

        Self {
            chain: Arc::new(chain),
            cache,
        }
    }

    /// Latest index value. Never fails.
    pub async fn fetch(&self) -> Quote {
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
    fn test_fallback_is_peso_denominated() {
        let fallback = static_fallback();
        assert_eq!(fallback.symbol, "MERVAL");
        assert_eq!(fallback.currency, "ARS");
    }
}
