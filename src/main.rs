use std::sync::Arc;

use doppio::config::AppConfig;
use doppio::setup::{SetupFlow, SetupRouteState, setup_routes};
use doppio::store::{LibSqlBackend, SetupStatusStore};
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env()?;

    let backend = Arc::new(LibSqlBackend::new_local(&config.db_path).await?);
    if backend.is_complete().await? {
        tracing::info!("First-run setup already complete, serving status only");
    }

    let flow = Arc::new(SetupFlow::new(
        backend.clone(),
        backend.clone(),
        backend.clone(),
    ));

    let app = setup_routes(SetupRouteState { flow }).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Setup service listening");
    axum::serve(listener, app).await?;

    Ok(())
}
