//! Core error types.
//!
//! Only construction can fail: once a [`Desk`](crate::Desk) exists, every
//! fetch surface is infallible by design (stale or synthetic data instead
//! of errors).

use thiserror::Error;

use tradingdesk_market_data::StoreError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for desk construction.
#[derive(Error, Debug)]
pub enum Error {
    /// An environment variable held an unusable value.
    #[error("Invalid configuration value: {0}")]
    Config(String),

    /// The snapshot store could not be opened or written.
    #[error("Snapshot store error: {0}")]
    Store(#[from] StoreError),
}
