use std::sync::Arc;

use anyhow::Context;
use shared::{IdentityConfig, ServiceConfig, StoreConfig};
use submit_service::{AirtableStore, AppState};
use tokio::net::TcpListener;

const DEFAULT_PORT: u16 = 3000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    shared::init_tracing("submit-service")
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::info!("Starting Submit Service...");

    // Missing credentials stop the process before anything is served.
    let store_config = StoreConfig::from_env().context("Record store configuration")?;
    let identity_config = IdentityConfig::from_env().context("Identity provider configuration")?;
    let service_config = ServiceConfig::from_env(DEFAULT_PORT).context("Service configuration")?;

    tracing::info!("Configuration:");
    tracing::info!("  Port: {}", service_config.port);
    tracing::info!("  Static Dir: {}", service_config.static_dir);
    tracing::info!("  Store: {:?}", store_config);
    tracing::info!(
        "  Farcaster Sign-In: {}",
        if identity_config.neynar_client_id.is_empty() { "Disabled" } else { "Enabled" }
    );

    if let Some(metrics_port) = service_config.metrics_port {
        shared::init_metrics(metrics_port)
            .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter: {}", e))?;
    }

    let store = AirtableStore::new(&store_config).context("Record store client")?;
    let state = AppState::new(Arc::new(store), identity_config);
    let app = submit_service::app(state, &service_config.static_dir);

    let address = format!("0.0.0.0:{}", service_config.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!("Submit Service listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Submit Service stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received terminate signal, shutting down"),
    }
}
