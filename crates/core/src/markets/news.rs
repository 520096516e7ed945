//! Financial headlines, one feed per publication tried in order.

use std::sync::Arc;
use std::time::Duration;

use tradingdesk_market_data::{
    FallbackChain, NewsFeed, NewsItem, ResultCache, RssProvider, SnapshotStore, SOURCE_FALLBACK,
};

const TTL: Duration = Duration::from_secs(300);
const SNAPSHOT_KEY: &str = "news";

const FEEDS: &[(&str, &str)] = &[
    ("Ámbito", "https://www.ambito.com/rss/pages/economia.xml"),
    ("Infobae", "https://www.infobae.com/feeds/rss/economia/"),
    ("El Cronista", "https://www.cronista.com/files/rss/finanzas-mercados.xml"),
];

fn static_fallback() -> NewsFeed {
    let items = vec![
        NewsItem {
            title: "Los mercados operan a la espera de definiciones económicas".to_string(),
            link: "https://www.ambito.com/economia".to_string(),
            source: "Ámbito".to_string(),
            published_at: None,
        },
        NewsItem {
            title: "El dólar blue se mantiene estable en la city porteña".to_string(),
            link: "https://www.ambito.com/finanzas".to_string(),
            source: "Ámbito".to_string(),
            published_at: None,
        },
        NewsItem {
            title: "El MERVAL acompaña la tendencia de los mercados regionales".to_string(),
            link: "https://www.cronista.com/finanzas-mercados".to_string(),
            source: "El Cronista".to_string(),
            published_at: None,
        },
    ];
    NewsFeed::new(SOURCE_FALLBACK, items)
}

/// Headlines service.
pub struct NewsService {
    chain: Arc<FallbackChain<NewsFeed>>,
    cache: ResultCache<NewsFeed>,
}

impl NewsService {
    pub fn new(store: Option<&Arc<SnapshotStore>>) -> Self {
        let mut chain = FallbackChain::new("news", static_fallback());
        for &(label, url) in FEEDS {
            chain = chain.with_adapter(Arc::new(RssProvider::new(label, url)));
        }

        let cache = match store {
            Some(store) => ResultCache::with_store("news", TTL, Arc::clone(store), SNAPSHOT_KEY),
            None => ResultCache::new("news", TTL),
        };

        Self {
            chain: Arc::new(chain),
            cache,
        }
    }

    /// Latest headlines. Never fails; worst case is the static set.
    pub async fn fetch(&self) -> NewsFeed {
        let chain = Arc::clone(&self.chain);
        self.cache
            .get_or_fetch(move || async move { chain.resolve().await })
            .await
    }
}
