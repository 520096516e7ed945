use tradingdesk_core::DeskConfig;
use tradingdesk_server::{api::app_router, build_state, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = DeskConfig::from_env()?;
    let state = build_state(&config)?;
    let router = app_router(state);

    let listen_addr = std::env::var("TRADINGDESK_LISTEN_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    tracing::info!("Listening on {}", listen_addr);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
