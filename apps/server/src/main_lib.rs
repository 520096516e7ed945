use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use tradingdesk_core::{Desk, DeskConfig, Result};

/// Shared application state.
pub struct AppState {
    pub desk: Desk,
}

/// Install the tracing subscriber (env-filtered, defaulting to info).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}

/// Build the application state from configuration.
pub fn build_state(config: &DeskConfig) -> Result<Arc<AppState>> {
    let desk = Desk::new(config)?;
    Ok(Arc::new(AppState { desk }))
}
