//! Country risk (EMBI spread) from the BCRA statistics API.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;

use tradingdesk_market_data::{
    BcraProvider, FallbackChain, Quote, ResultCache, SnapshotStore, SOURCE_FALLBACK,
};

const TTL: Duration = Duration::from_secs(60 * 60);
const SNAPSHOT_KEY: &str = "country-risk";

/// BCRA series id for the country-risk spread.
const SERIES_ID: u32 = 40;

fn static_fallback() -> Quote {
    Quote::new("Riesgo País", dec!(1520), "ARS".into(), SOURCE_FALLBACK)
}

/// Country-risk service.
pub struct CountryRiskService {
    chain: Arc<FallbackChain<Quote>>,
    cache: ResultCache<Quote>,
}

impl CountryRiskService {
    pub fn new(store: Option<&Arc<SnapshotStore>>) -> Self {
        let chain = FallbackChain::new("country_risk", static_fallback())
            .with_adapter(Arc::new(BcraProvider::new(SERIES_ID, "Riesgo País")));

        let cache = match store {
            Some(store) => {
                ResultCache::with_store("country_risk", TTL, Arc::clone(store), SNAPSHOT_KEY)
            }
            None => ResultCache::new("country_risk", TTL),
        };

        Self {
            chain: Arc::new(chain),
            cache,
        }
    }

    /// Latest country-risk reading (basis points). Never fails.
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
        assert_eq!(fallback.symbol, "Riesgo País");
        assert!(fallback.change_percent.is_none());
    }
}
