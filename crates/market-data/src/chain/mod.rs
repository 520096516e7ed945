//! Ordered fallback chain over source adapters.
//!
//! One chain is constructed per asset class at service construction and
//! never mutated afterwards. Resolution tries the adapters strictly in
//! construction order and always yields a value: the first success, or the
//! static fallback literal when every adapter fails.

use std::sync::Arc;

use log::{debug, warn};

use crate::errors::FetchError;
use crate::models::{Sourced, SOURCE_FALLBACK};
use crate::provider::SourceAdapter;

/// An ordered adapter list plus exactly one static fallback literal.
///
/// `resolve` never returns an error and never panics; the caller always
/// receives a `T`, possibly the fallback, distinguishable by its `source`
/// label. Adapter order is fixed at construction (primary provider first);
/// there is no reordering based on historical success and no racing -
/// adapter N+1 is never started before adapter N's outcome is known.
pub struct FallbackChain<T> {
    asset: &'static str,
    adapters: Vec<Arc<dyn SourceAdapter<T>>>,
    fallback: T,
}

impl<T> FallbackChain<T>
where
    T: Sourced + Clone + Send + Sync,
{
    /// Create a chain with its static fallback and no adapters yet.
    pub fn new(asset: &'static str, fallback: T) -> Self {
        Self {
            asset,
            adapters: Vec::new(),
            fallback,
        }
    }

    /// Append an adapter; earlier adapters are preferred.
    pub fn with_adapter(mut self, adapter: Arc<dyn SourceAdapter<T>>) -> Self {
        self.adapters.push(adapter);
        self
    }

    /// Number of adapters in the chain.
    pub fn adapter_count(&self) -> usize {
        self.adapters.len()
    }

    /// Resolve a value, trying each adapter in order.
    ///
    /// Each attempt is bounded by the adapter's own timeout; expiry counts
    /// as a `Timeout` failure and moves the chain along, exactly like any
    /// other failure kind.
    pub async fn resolve(&self) -> T {
        for adapter in &self.adapters {
            let error = match tokio::time::timeout(adapter.timeout(), adapter.fetch()).await {
                Ok(Ok(mut value)) => {
                    debug!("{}: resolved from '{}'", self.asset, adapter.id());
                    value.set_source(adapter.id());
                    return value;
                }
                Ok(Err(e)) => e,
                Err(_) => FetchError::Timeout {
                    provider: adapter.id().to_string(),
                },
            };

            warn!(
                "{}: source '{}' failed ({}), trying next",
                self.asset,
                adapter.id(),
                error
            );
        }

        warn!("{}: all sources failed, serving static fallback", self.asset);
        let mut value = self.fallback.clone();
        value.set_source(SOURCE_FALLBACK);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Quote;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    enum Behavior {
        Succeed { price: Decimal, change_percent: Decimal },
        Fail,
        Hang,
    }

    struct MockAdapter {
        id: &'static str,
        behavior: Behavior,
        call_count: AtomicUsize,
    }

    impl MockAdapter {
        fn new(id: &'static str, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                id,
                behavior,
                call_count: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SourceAdapter<Quote> for MockAdapter {
        fn id(&self) -> &'static str {
            self.id
        }

        fn timeout(&self) -> Duration {
            Duration::from_millis(30)
        }

        async fn fetch(&self) -> Result<Quote, FetchError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);

            match &self.behavior {
                Behavior::Succeed { price, change_percent } => Ok(Quote::new(
                    "bitcoin",
                    *price,
                    "USD".into(),
                    self.id,
                )
                .with_change_percent(*change_percent)),
                Behavior::Fail => Err(FetchError::Network {
                    provider: self.id.to_string(),
                    message: "connection refused".to_string(),
                }),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    unreachable!("timed out before completing")
                }
            }
        }
    }

    fn static_fallback() -> Quote {
        Quote::new("bitcoin", dec!(42150), "USD".into(), "unset").with_change_percent(dec!(2.5))
    }

    #[tokio::test]
    async fn test_first_success_wins_and_later_adapters_never_run() {
        let a = MockAdapter::new("A", Behavior::Fail);
        let b = MockAdapter::new("B", Behavior::Succeed { price: dec!(101), change_percent: dec!(0.5) });
        let c = MockAdapter::new("C", Behavior::Succeed { price: dec!(999), change_percent: dec!(9.9) });

        let chain = FallbackChain::new("crypto", static_fallback())
            .with_adapter(a.clone())
            .with_adapter(b.clone())
            .with_adapter(c.clone());

        let quote = chain.resolve().await;

        assert_eq!(quote.source, "B");
        assert_eq!(quote.price, dec!(101));
        assert_eq!(a.calls(), 1);
        assert_eq!(b.calls(), 1);
        assert_eq!(c.calls(), 0);
    }

    #[tokio::test]
    async fn test_all_failures_serve_static_fallback() {
        let a = MockAdapter::new("A", Behavior::Fail);
        let b = MockAdapter::new("B", Behavior::Hang);

        let chain = FallbackChain::new("crypto", static_fallback())
            .with_adapter(a.clone())
            .with_adapter(b.clone());

        let quote = chain.resolve().await;

        assert_eq!(quote.source, SOURCE_FALLBACK);
        assert_eq!(quote.price, dec!(42150));
        assert_eq!(quote.change_percent, Some(dec!(2.5)));
        assert_eq!(a.calls(), 1);
        assert_eq!(b.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_chain_serves_static_fallback() {
        let chain: FallbackChain<Quote> = FallbackChain::new("crypto", static_fallback());

        let quote = chain.resolve().await;

        assert_eq!(quote.source, SOURCE_FALLBACK);
        assert_eq!(quote.price, dec!(42150));
    }

    #[tokio::test]
    async fn test_hung_primary_falls_through_to_secondary() {
        let primary = MockAdapter::new("CoinGecko", Behavior::Hang);
        let secondary = MockAdapter::new(
            "CoinCap",
            Behavior::Succeed { price: dec!(43000), change_percent: dec!(1.2) },
        );

        let chain = FallbackChain::new("crypto", static_fallback())
            .with_adapter(primary.clone())
            .with_adapter(secondary.clone());

        let quote = chain.resolve().await;

        assert_eq!(quote.symbol, "bitcoin");
        assert_eq!(quote.price, dec!(43000));
        assert_eq!(quote.change_percent, Some(dec!(1.2)));
        assert_eq!(quote.source, "CoinCap");
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 1);
    }

    #[tokio::test]
    async fn test_vec_results_are_stamped_per_quote() {
        struct ListAdapter;

        #[async_trait]
        impl SourceAdapter<Vec<Quote>> for ListAdapter {
            fn id(&self) -> &'static str {
                "Bluelytics"
            }

            async fn fetch(&self) -> Result<Vec<Quote>, FetchError> {
                Ok(vec![
                    Quote::new("USD/ARS Oficial", dec!(990), "ARS".into(), "unset"),
                    Quote::new("USD/ARS Blue", dec!(1485), "ARS".into(), "unset"),
                ])
            }
        }

        let chain = FallbackChain::new("dollar", Vec::new()).with_adapter(Arc::new(ListAdapter));

        let quotes = chain.resolve().await;

        assert_eq!(quotes.len(), 2);
        assert!(quotes.iter().all(|q| q.source == "Bluelytics"));
    }
}
