//! Commodity quotes: FMP first when a key is configured, Yahoo futures after.

use std::sync::Arc;
use std::time::Duration;

use log::info;
use rust_decimal_macros::dec;

use tradingdesk_market_data::{
    FallbackChain, FmpProvider, Quote, ResultCache, SnapshotStore, SymbolSpec, YahooProvider,
    SOURCE_FALLBACK,
};

const TTL: Duration = Duration::from_secs(300);
const SNAPSHOT_KEY: &str = "commodities";

const FMP_SYMBOLS: &[SymbolSpec] = &[
    SymbolSpec { ticker: "GCUSD", symbol: "Oro" },
    SymbolSpec { ticker: "SIUSD", symbol: "Plata" },
    SymbolSpec { ticker: "CLUSD", symbol: "Petróleo WTI" },
    SymbolSpec { ticker: "NGUSD", symbol: "Gas Natural" },
];

const YAHOO_SYMBOLS: &[SymbolSpec] = &[
    SymbolSpec { ticker: "GC=F", symbol: "Oro" },
    SymbolSpec { ticker: "SI=F", symbol: "Plata" },
    SymbolSpec { ticker: "CL=F", symbol: "Petróleo WTI" },
    SymbolSpec { ticker: "NG=F", symbol: "Gas Natural" },
];

fn static_fallback() -> Vec<Quote> {
    vec![
        Quote::new("Oro", dec!(2045.30), "USD".into(), SOURCE_FALLBACK)
            .with_change_percent(dec!(0.3)),
        Quote::new("Plata", dec!(23.15), "USD".into(), SOURCE_FALLBACK)
            .with_change_percent(dec!(-0.2)),
        Quote::new("Petróleo WTI", dec!(73.80), "USD".into(), SOURCE_FALLBACK)
            .with_change_percent(dec!(1.4)),
        Quote::new("Gas Natural", dec!(2.61), "USD".into(), SOURCE_FALLBACK)
            .with_change_percent(dec!(-1.1)),
    ]
}

/// Commodity board service.
pub struct CommodityService {
    chain: Arc<FallbackChain<Vec<Quote>>>,
    cache: ResultCache<Vec<Quote>>,
}

impl CommodityService {
    pub fn new(fmp_api_key: Option<&str>, store: Option<&Arc<SnapshotStore>>) -> Self {
        let mut chain = FallbackChain::new("commodities", static_fallback());

        if let Some(key) = fmp_api_key {
            chain = chain.with_adapter(Arc::new(FmpProvider::new(
                key.to_string(),
                FMP_SYMBOLS.to_vec(),
            )));
        } else {
            info!("commodities: no FMP API key configured, chain starts from Yahoo");
        }
        chain = chain.with_adapter(Arc::new(YahooProvider::new(YAHOO_SYMBOLS.to_vec())));

        let cache = match store {
            Some(store) => {
                ResultCache::with_store("commodities", TTL, Arc::clone(store), SNAPSHOT_KEY)
            }
            None => ResultCache::new("commodities", TTL),
        };

        Self {
            chain: Arc::new(chain),
            cache,
        }
    }

    /// Latest commodity quotes. Never fails.
    pub async fn fetch(&self) -> Vec<Quote> {
        let chain = Arc::clone(&self.chain);
        self.cache
            .get_or_fetch(move || async move { chain.resolve().await })
            .await
    }
}
