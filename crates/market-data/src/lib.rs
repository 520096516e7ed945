//! Trading Desk Market Data Crate
//!
//! This crate provides the resilient fetch-and-fallback pipeline behind the
//! Trading Desk dashboard: source adapters for the upstream market-data
//! providers, an ordered fallback chain that always yields a result, a
//! short-lived result cache with request coalescing, and the display
//! formatting rules for the Argentine audience.
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |  SourceAdapter   | --> |  normalized T    |  (Quote, Vec<Quote>, NewsFeed)
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+
//! |  FallbackChain   |  (ordered adapters + static fallback)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |   ResultCache    |  (TTL + single-flight coalescing)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |    Formatter     |  (locale-aware display strings)
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Quote`] - Normalized market-data record (price, change, source)
//! - [`SourceAdapter`] - Single-provider fetch-and-normalize unit
//! - [`FallbackChain`] - Ordered adapter list plus static literal
//! - [`ResultCache`] - TTL memoization with single-flight coalescing
//! - [`SnapshotStore`] - Last-good-value persistence across restarts

pub mod cache;
pub mod chain;
pub mod errors;
pub mod format;
pub mod models;
pub mod provider;
pub mod store;

// Re-export all public types from models
pub use models::{Currency, NewsFeed, NewsItem, ProviderId, Quote, Sourced, SOURCE_FALLBACK};

// Re-export the engine types
pub use cache::{CacheEntry, ResultCache};
pub use chain::FallbackChain;
pub use errors::FetchError;
pub use store::{Snapshot, SnapshotStore, StoreError};

// Re-export formatter types
pub use format::{DisplayQuote, Locale};

// Re-export provider types
pub use provider::bcra::BcraProvider;
pub use provider::bluelytics::BluelyticsProvider;
pub use provider::coincap::CoinCapProvider;
pub use provider::coingecko::{CoinGeckoProvider, CoinSpec};
pub use provider::fmp::{FmpProvider, SymbolSpec};
pub use provider::rss::RssProvider;
pub use provider::yahoo::YahooProvider;
pub use provider::SourceAdapter;
