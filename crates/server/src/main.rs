use anyhow::Context;
use server::{AppState, config::ServerConfig, routes};
use services::services::paypal_checkout::PaypalClient;
use utils::logging::{init_sentry, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env()?;
    let _sentry = init_sentry(config.sentry_dsn.as_deref());
    init_tracing(Some("info,server=debug,services=debug"));

    let paypal = PaypalClient::new(config.paypal)?;
    let app = routes::router(AppState::new(paypal, config.checkout));

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    tracing::info!("Payment server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
