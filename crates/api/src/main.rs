use std::sync::Arc;

use anyhow::Context;

use menuboard_api::app::{build_app, AppServices};
use menuboard_api::config::AppConfig;
use menuboard_infra::payments::MercadoPagoCheckout;
use menuboard_infra::workers::SubscriptionSweeper;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    menuboard_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    let checkout = MercadoPagoCheckout::new(config.mercado_pago())
        .context("failed to build payment provider client")?;
    let services = Arc::new(
        AppServices::in_memory(Arc::new(checkout), config.message_style())
            .with_webhook_secret(config.mercado_pago_webhook_secret.clone()),
    );

    let sweeper = SubscriptionSweeper::new(
        services.establishment_store(),
        config.subscription_sweep_interval,
    )
    .spawn();

    let app = build_app(services);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    sweeper.shutdown().await;
    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
