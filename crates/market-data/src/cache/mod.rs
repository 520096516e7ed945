//! Short-lived result memoization with request coalescing.
//!
//! Each asset-class service owns one `ResultCache`. The cache holds the
//! last resolved value for its TTL, replaces (never merges) it on refresh,
//! and coalesces concurrent callers into a single underlying fetch: while
//! one resolution is in flight, later callers await the same shared future
//! instead of triggering a duplicate. Expiry is lazy - checked on read,
//! with no background sweeper.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::store::{Snapshot, SnapshotStore};

/// A cached value and the time it was fetched.
#[derive(Clone, Debug)]
pub struct CacheEntry<T> {
    /// The cached value
    pub value: T,
    /// When the value was stored
    pub fetched_at: DateTime<Utc>,
}

struct CacheState<T> {
    entry: Option<CacheEntry<T>>,
    in_flight: Option<Shared<BoxFuture<'static, T>>>,
}

type PersistFn<T> = Arc<dyn Fn(&T, DateTime<Utc>) + Send + Sync>;

/// TTL memoization over an infallible resolver.
///
/// The resolver is expected to be a fallback chain's `resolve`, which
/// cannot fail, so the cache never holds an error state. The entry and the
/// in-flight marker are the only shared mutable state in the pipeline;
/// both live behind one async mutex so the check-and-set stays atomic on a
/// multi-threaded runtime.
pub struct ResultCache<T> {
    name: &'static str,
    ttl: chrono::Duration,
    state: Arc<Mutex<CacheState<T>>>,
    persist: Option<PersistFn<T>>,
}

impl<T> ResultCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a cache with the given TTL and no persistence.
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
            state: Arc::new(Mutex::new(CacheState {
                entry: None,
                in_flight: None,
            })),
            persist: None,
        }
    }

    /// Create a cache backed by a snapshot store.
    ///
    /// The entry is seeded from the persisted snapshot (if any), so a
    /// restarted process can answer from its last good value while the
    /// snapshot is still within the TTL, and every successful resolution
    /// is written back under `key`.
    pub fn with_store(
        name: &'static str,
        ttl: Duration,
        store: Arc<SnapshotStore>,
        key: &'static str,
    ) -> Self
    where
        T: Serialize + DeserializeOwned,
    {
        let entry = store.load::<T>(key).map(|snapshot| {
            debug!("{}: seeded from snapshot ({})", name, snapshot.fetched_at);
            CacheEntry {
                value: snapshot.value,
                fetched_at: snapshot.fetched_at,
            }
        });

        let persist: PersistFn<T> = Arc::new(move |value: &T, fetched_at| {
            let snapshot = Snapshot {
                fetched_at,
                value: value.clone(),
            };
            if let Err(e) = store.save(key, &snapshot) {
                warn!("{}: failed to persist snapshot: {}", name, e);
            }
        });

        Self {
            name,
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
            state: Arc::new(Mutex::new(CacheState {
                entry,
                in_flight: None,
            })),
            persist: Some(persist),
        }
    }

    /// Return the cached value while fresh, otherwise resolve and store.
    ///
    /// Concurrent callers during a miss share one resolution: `resolve` is
    /// invoked at most once per refresh, and every waiter receives the
    /// same value.
    pub async fn get_or_fetch<F, Fut>(&self, resolve: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let shared = {
            let mut state = self.state.lock().await;

            if let Some(entry) = &state.entry {
                if Utc::now() - entry.fetched_at < self.ttl {
                    debug!("{}: cache hit", self.name);
                    return entry.value.clone();
                }
            }

            if let Some(in_flight) = &state.in_flight {
                debug!("{}: joining in-flight fetch", self.name);
                in_flight.clone()
            } else {
                debug!("{}: cache miss, fetching", self.name);
                let state_ref = Arc::clone(&self.state);
                let persist = self.persist.clone();
                let fut = resolve();
                let shared = async move {
                    let value = fut.await;
                    let fetched_at = Utc::now();
                    if let Some(persist) = &persist {
                        persist(&value, fetched_at);
                    }
                    let mut state = state_ref.lock().await;
                    state.entry = Some(CacheEntry {
                        value: value.clone(),
                        fetched_at,
                    });
                    state.in_flight = None;
                    value
                }
                .boxed()
                .shared();
                state.in_flight = Some(shared.clone());
                shared
            }
        };

        shared.await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Quote;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn quote(price: rust_decimal::Decimal) -> Quote {
        Quote::new("BTC/USD", price, "USD".into(), "CoinGecko")
    }

    #[tokio::test]
    async fn test_cache_hit_within_ttl() {
        let cache: ResultCache<Quote> = ResultCache::new("crypto", Duration::from_millis(80));
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let calls = Arc::clone(&calls);
            cache
                .get_or_fetch(move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    quote(dec!(43000))
                })
                .await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(100)).await;

        let calls_clone = Arc::clone(&calls);
        cache
            .get_or_fetch(move || async move {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                quote(dec!(43100))
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_refresh_replaces_value() {
        let cache: ResultCache<Quote> = ResultCache::new("crypto", Duration::from_millis(20));

        let first = cache.get_or_fetch(|| async { quote(dec!(43000)) }).await;
        assert_eq!(first.price, dec!(43000));

        tokio::time::sleep(Duration::from_millis(40)).await;

        let second = cache.get_or_fetch(|| async { quote(dec!(44500)) }).await;
        assert_eq!(second.price, dec!(44500));

        // still fresh: the replaced value is what later callers see
        let third = cache.get_or_fetch(|| async { quote(dec!(0)) }).await;
        assert_eq!(third.price, dec!(44500));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_single_flight_coalesces_concurrent_callers() {
        let cache: Arc<ResultCache<Quote>> =
            Arc::new(ResultCache::new("crypto", Duration::from_secs(60)));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..2 {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_fetch(move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        quote(dec!(43000))
                    })
                    .await
            }));
        }

        let mut prices = Vec::new();
        for handle in handles {
            prices.push(handle.await.unwrap().price);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(prices, vec![dec!(43000), dec!(43000)]);
    }

    #[tokio::test]
    async fn test_store_seeds_and_persists() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(SnapshotStore::open(tmp.path()).unwrap());

        // first process: resolve once, which persists
        {
            let cache: ResultCache<Quote> = ResultCache::with_store(
                "merval",
                Duration::from_secs(60),
                Arc::clone(&store),
                "merval",
            );
            cache.get_or_fetch(|| async { quote(dec!(2134567)) }).await;
        }

        // second process: seeded entry answers without resolving
        {
            let cache: ResultCache<Quote> = ResultCache::with_store(
                "merval",
                Duration::from_secs(60),
                Arc::clone(&store),
                "merval",
            );
            let calls = Arc::new(AtomicUsize::new(0));
            let calls_clone = Arc::clone(&calls);
            let value = cache
                .get_or_fetch(move || async move {
                    calls_clone.fetch_add(1, Ordering::SeqCst);
                    quote(dec!(0))
                })
                .await;

            assert_eq!(value.price, dec!(2134567));
            assert_eq!(calls.load(Ordering::SeqCst), 0);
        }
    }
}
