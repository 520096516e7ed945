//! Argentine ADR quotes: FMP first when a key is configured, Yahoo after.

use std::sync::Arc;
use std::time::Duration;

use log::info;
use rust_decimal_macros::dec;

use tradingdesk_market_data::{
    FallbackChain, FmpProvider, Quote, ResultCache, SnapshotStore, SymbolSpec, YahooProvider,
    SOURCE_FALLBACK,
};

const TTL: Duration = Duration::from_secs(120);
const SNAPSHOT_KEY: &str = "equities";

const SYMBOLS: &[SymbolSpec] = &[
    SymbolSpec { ticker: "YPF", symbol: "YPF" },
    SymbolSpec { ticker: "GGAL", symbol: "GGAL" },
    SymbolSpec { ticker: "BMA", symbol: "BMA" },
    SymbolSpec { ticker: "PAM", symbol: "PAM" },
    SymbolSpec { ticker: "MELI", symbol: "MELI" },
];

fn static_fallback() -> Vec<Quote> {
    vec![
        Quote::new("YPF", dec!(22.85), "USD".into(), SOURCE_FALLBACK)
            .with_change_percent(dec!(2.0)),
        Quote::new("GGAL", dec!(48.30), "USD".into(), SOURCE_FALLBACK)
            .with_change_percent(dec!(1.1)),
        Quote::new("BMA", dec!(71.60), "USD".into(), SOURCE_FALLBACK)
            .with_change_percent(dec!(-0.4)),
        Quote::new("PAM", dec!(64.15), "USD".into(), SOURCE_FALLBACK)
            .with_change_percent(dec!(0.6)),
        Quote::new("MELI", dec!(1680.00), "USD".into(), SOURCE_FALLBACK)
            .with_change_percent(dec!(1.5)),
    ]
}

/// ADR board service.
pub struct EquityService {
    chain: Arc<FallbackChain<Vec<Quote>>>,
    cache: ResultCache<Vec<Quote>>,
}

impl EquityService {
    pub fn new(fmp_api_key: Option<&str>, store: Option<&Arc<SnapshotStore>>) -> Self {
        let mut chain = FallbackChain::new("equities", static_fallback());

        if let Some(key) = fmp_api_key {
            chain = chain.with_adapter(Arc::new(FmpProvider::new(key.to_string(), SYMBOLS.to_vec())));
        } else {
            info!("equities: no FMP API key configured, chain starts from Yahoo");
        }
        chain = chain.with_adapter(Arc::new(YahooProvider::new(SYMBOLS.to_vec())));

        let cache = match store {
            Some(store) => {
                ResultCache::with_store("equities", TTL, Arc::clone(store), SNAPSHOT_KEY)
            }
            None => ResultCache::new("equities", TTL),
        };

        Self {
            chain: Arc::new(chain),
            cache,
        }
    }

    /// Latest ADR quotes. Never fails.
    pub async fn fetch(&self) -> Vec<Quote> {
        let chain = Arc::clone(&self.chain);
        self.cache
            .get_or_fetch(move || async move { chain.resolve().await })
            .await
    }
}
