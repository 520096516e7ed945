//! Error types for the market data pipeline.
//!
//! Every failure kind an upstream provider can produce is converted into a
//! [`FetchError`] at the source-adapter boundary. Nothing past that boundary
//! ever sees a raw transport or parse error.

use thiserror::Error;

/// Errors produced by a source adapter.
///
/// The fallback chain treats every variant identically (move to the next
/// adapter), so the classification exists for logging and diagnostics, not
/// for control flow.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request never produced a usable HTTP response
    /// (connection refused, DNS failure, TLS error, etc.).
    #[error("Network error: {provider} - {message}")]
    Network {
        /// The provider that failed
        provider: String,
        /// Transport-level detail
        message: String,
    },

    /// The bounded wait for the provider expired.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider answered with a success status but the body was
    /// malformed, empty, or missing required fields.
    #[error("Unexpected response shape: {provider} - {message}")]
    UnexpectedShape {
        /// The provider that returned the body
        provider: String,
        /// What was wrong with it
        message: String,
    },

    /// The provider throttled the request (HTTP 429 or an explicit
    /// limit message in the body).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that throttled us
        provider: String,
    },
}

impl FetchError {
    /// Convert a transport error from reqwest into the pipeline taxonomy.
    ///
    /// Timeouts are distinguished so the chain's logging can tell a slow
    /// provider from an unreachable one; everything else is a network error.
    pub fn from_reqwest(provider: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                provider: provider.to_string(),
            }
        } else {
            Self::Network {
                provider: provider.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// Build an `UnexpectedShape` error for a provider.
    pub fn shape(provider: &str, message: impl Into<String>) -> Self {
        Self::UnexpectedShape {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// The provider this failure came from.
    pub fn provider(&self) -> &str {
        match self {
            Self::Network { provider, .. }
            | Self::Timeout { provider }
            | Self::UnexpectedShape { provider, .. }
            | Self::RateLimited { provider } => provider,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = FetchError::Timeout {
            provider: "CoinGecko".to_string(),
        };
        assert_eq!(format!("{}", error), "Timeout: CoinGecko");

        let error = FetchError::RateLimited {
            provider: "FMP".to_string(),
        };
        assert_eq!(format!("{}", error), "Rate limited: FMP");

        let error = FetchError::shape("Bluelytics", "missing field `blue`");
        assert_eq!(
            format!("{}", error),
            "Unexpected response shape: Bluelytics - missing field `blue`"
        );
    }

    #[test]
    fn test_provider_accessor() {
        let error = FetchError::Network {
            provider: "BCRA".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(error.provider(), "BCRA");

        let error = FetchError::shape("Yahoo", "empty result array");
        assert_eq!(error.provider(), "Yahoo");
    }
}
