//! Source adapters for the upstream market-data providers.
//!
//! One module per provider. Each adapter knows how to call a single
//! endpoint and translate that provider's response schema into the
//! normalized model; provider field names never leak past this layer.

pub mod bcra;
pub mod bluelytics;
pub mod coincap;
pub mod coingecko;
pub mod fmp;
pub mod rss;
mod traits;
pub mod yahoo;

pub use traits::{SourceAdapter, DEFAULT_TIMEOUT};
