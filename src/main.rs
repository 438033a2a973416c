//! Main entry point for the VPC Request Chain Tracer

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vpc_chain_tracer::{api, config::Settings, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Best-effort .env loading for local runs
    let _ = dotenvy::dotenv();

    // Load configuration
    let settings = Settings::load()?;
    settings.validate()?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.logging.level.clone()));

    if settings.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }

    info!("Starting VPC Request Chain Tracer");
    info!(
        app_b_url = %settings.internal.base_url,
        probe_attempts = settings.internal.probe_attempts,
        "Loaded configuration"
    );

    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    // Create application state
    let app_state = Arc::new(AppState::new(settings));

    // Build the router
    let app = api::routes::create_router(app_state).await;

    info!("Server listening on {}", addr);

    // Connect info is required so handlers can see the transport peer
    // address, which is compared against the forwarding headers.
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
