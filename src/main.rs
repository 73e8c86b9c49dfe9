use std::net::SocketAddr;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::signal;

use mail_gateway::config::Settings;
use mail_gateway::ratelimit::spawn_cleanup_task;
use mail_gateway::server::{create_app, AppState};
use mail_gateway::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration errors are fatal before anything else starts
    let settings = Settings::new()?;
    init_telemetry(&settings.log)?;
    tracing::info!("Configuration loaded");

    let state = AppState::build(settings.clone()).await?;
    tracing::info!(templates = state.templates.count(), "Application state initialized");

    let cleanup_handle = state
        .rate_limiter
        .is_enabled()
        .then(|| spawn_cleanup_task(state.rate_limiter.clone()));
    let postgres_pool = state.postgres_pool.clone();

    let app = create_app(state);

    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    if let Some(handle) = cleanup_handle {
        handle.abort();
    }
    if let Some(pool) = postgres_pool {
        pool.close().await;
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
