use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use babycare_backend::config::AppConfig;
use babycare_backend::domain::NotificationScheduler;
use babycare_backend::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;
    let app_state = initialize_backend(&config).await?;

    let scheduler = NotificationScheduler::new(app_state.notifier.clone())
        .with_interval(config.notification_interval)
        .start();

    let app = create_router(app_state, &config)?;

    info!("Starting server on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if !scheduler.is_running() {
        warn!("Notification scheduler exited before shutdown");
    }
    info!("Shutting down notification scheduler");
    scheduler.stop().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        // Without a signal handler, keep serving
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
