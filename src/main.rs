//! CampusConnect API server
//!
//! Main application entry point

use std::net::SocketAddr;
use anyhow::Context;
use tracing::info;

use CampusConnect::{
    build_router,
    config::Settings,
    database::DatabaseService,
    services::ServiceFactory,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate()?;

    // Initialize logging; the guard flushes the file writer on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", CampusConnect::info());

    info!(backend = ?settings.database.backend, "Connecting to storage...");
    let database = DatabaseService::connect(&settings.database).await?;

    info!("Initializing services...");
    let bind_address = settings.bind_address();
    let services = ServiceFactory::new(settings, database)?;

    let health = services.health_check().await;
    for issue in health.get_issues() {
        tracing::warn!(issue = %issue, "Service check");
    }

    let app = build_router(services);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {}", bind_address))?;
    info!("Server listening on {}", bind_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("CampusConnect server has been shut down.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
