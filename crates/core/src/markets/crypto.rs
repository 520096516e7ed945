//! Crypto quotes: CoinGecko first, CoinCap second.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;

use tradingdesk_market_data::{
    CoinCapProvider, CoinGeckoProvider, CoinSpec, FallbackChain, Quote, ResultCache, SnapshotStore,
    SOURCE_FALLBACK,
};

const TTL: Duration = Duration::from_secs(60);
const SNAPSHOT_KEY: &str = "crypto";

const COINS: &[CoinSpec] = &[
    CoinSpec { id: "bitcoin", symbol: "BTC/USD" },
    CoinSpec { id: "ethereum", symbol: "ETH/USD" },
    CoinSpec { id: "solana", symbol: "SOL/USD" },
    CoinSpec { id: "binancecoin", symbol: "BNB/USD" },
];

fn static_fallback() -> Vec<Quote> {
    vec![
        Quote::new("BTC/USD", dec!(42150.00), "USD".into(), SOURCE_FALLBACK)
            .with_change_percent(dec!(2.5)),
        Quote::new("ETH/USD", dec!(2280.00), "USD".into(), SOURCE_FALLBACK)
            .with_change_percent(dec!(1.8)),
        Quote::new("SOL/USD", dec!(98.50), "USD".into(), SOURCE_FALLBACK)
            .with_change_percent(dec!(-0.7)),
        Quote::new("BNB/USD", dec!(312.40), "USD".into(), SOURCE_FALLBACK)
            .with_change_percent(dec!(0.9)),
    ]
}

/// Crypto board service.
pub struct CryptoService {
    chain: Arc<FallbackChain<Vec<Quote>>>,
    cache: ResultCache<Vec<Quote>>,
}

impl CryptoService {
    pub fn new(store: Option<&Arc<SnapshotStore>>) -> Self {
        let chain = FallbackChain::new("crypto", static_fallback())
            .with_adapter(Arc::new(CoinGeckoProvider::new(COINS.to_vec())))
            .with_adapter(Arc::new(CoinCapProvider::new(COINS.to_vec())));

        let cache = match store {
            Some(store) => {
                ResultCache::with_store("crypto", TTL, Arc::clone(store), SNAPSHOT_KEY)
            }
            None => ResultCache::new("crypto", TTL),
        };

        Self {
            chain: Arc::new(chain),
            cache,
        }
    }

    /// Latest crypto quotes. Never fails; worst case is the static board.
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
    fn test_chain_orders_coingecko_first() {
        let service = CryptoService::new(None);
        assert_eq!(service.chain.adapter_count(), 2);
    }

    #[test]
    fn test_fallback_covers_every_coin() {
        let fallback = static_fallback();
        assert_eq!(fallback.len(), COINS.len());
        assert!(fallback.iter().all(|q| q.source == SOURCE_FALLBACK));
        assert!(fallback.iter().all(|q| q.change_percent.is_some()));
    }
}
