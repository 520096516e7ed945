//! Monthly inflation from the BCRA statistics API.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;

use tradingdesk_market_data::{
    BcraProvider, FallbackChain, Quote, ResultCache, SnapshotStore, SOURCE_FALLBACK,
};

const TTL: Duration = Duration::from_secs(12 * 60 * 60);
const SNAPSHOT_KEY: &str = "inflation";

/// BCRA series id for the monthly CPI variation.
const SERIES_ID: u32 = 27;

fn static_fallback() -> Quote {
    Quote::new("Inflación Mensual", dec!(2.2), "ARS".into(), SOURCE_FALLBACK)
}

/// Monthly inflation service.
pub struct InflationService {
    chain: Arc<FallbackChain<Quote>>,
    cache: ResultCache<Quote>,
}

impl InflationService {
    pub fn new(store: Option<&Arc<SnapshotStore>>) -> Self {
        let chain = FallbackChain::new("inflation", static_fallback())
            .with_adapter(Arc::new(BcraProvider::new(SERIES_ID, "Inflación Mensual")));

        let cache = match store {
            Some(store) => {
                ResultCache::with_store("inflation", TTL, Arc::clone(store), SNAPSHOT_KEY)
            }
            None => ResultCache::new("inflation", TTL),
        };

        Self {
            chain: Arc::new(chain),
            cache,
        }
    }

    /// Latest monthly CPI variation (a percentage). Never fails.
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
    fn test_fallback_shape() {
        let fallback = static_fallback();
        assert_eq!(fallback.symbol, "Inflación Mensual");
        assert_eq!(fallback.source, SOURCE_FALLBACK);
    }
}
