//! Source adapter trait definition.

use std::time::Duration;

use async_trait::async_trait;

use crate::errors::FetchError;

/// Timeout applied when an adapter does not declare its own.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A single-provider fetch-and-normalize unit.
///
/// Implement this trait to add support for a new upstream provider. `T` is
/// the normalized shape the adapter produces ([`Quote`](crate::Quote),
/// `Vec<Quote>`, or [`NewsFeed`](crate::NewsFeed)); one provider type may
/// implement the trait for more than one shape.
///
/// # Contract
///
/// - `fetch` issues exactly one outbound HTTP request per invocation and
///   performs no internal retry; trying again is the fallback chain's job,
///   realized as "try the next adapter".
/// - Every failure kind is converted into a [`FetchError`] at this
///   boundary. A successful HTTP status with a malformed or empty body is
///   `UnexpectedShape`, never a panic or a raw parse error.
/// - The chain races `fetch` against [`timeout`](SourceAdapter::timeout),
///   so a hung provider is bounded even if the HTTP client's own timeout
///   misbehaves.
#[async_trait]
pub trait SourceAdapter<T>: Send + Sync {
    /// Label identifying this adapter.
    ///
    /// Stamped on resolved values as their `source` and used in logs.
    fn id(&self) -> &'static str;

    /// Upper bound for one fetch attempt.
    fn timeout(&self) -> Duration {
        DEFAULT_TIMEOUT
    }

    /// Perform one fetch against the provider and normalize the response.
    async fn fetch(&self) -> Result<T, FetchError>;
}
