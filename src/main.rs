use catalog_service::{
    api::{self, AppState},
    config::{self, database},
    core::{product::ProductRepository, snapshot::SnapshotReader},
    errors::Result,
};
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Make it non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Failed to load application configuration: {}", e))?;
    info!(
        snapshot = %app_config.snapshot_path.display(),
        "Successfully processed application configuration."
    );

    // 4. Connect to the primary store. The handle is owned here and injected below.
    let db = database::create_connection(&app_config.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to primary store: {}", e))?;

    // 5. Ensure tables exist. Reads can still be served from the snapshot if this fails.
    if let Err(e) = database::create_tables(&db).await {
        warn!("Failed to create tables, product reads will use the snapshot: {}", e);
    }

    // 6. Serve
    let db = Arc::new(db);
    let state = AppState {
        products: ProductRepository::new(
            Arc::clone(&db),
            SnapshotReader::new(&app_config.snapshot_path),
        ),
        db,
    };
    let listener = tokio::net::TcpListener::bind(app_config.bind_address())
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", app_config.bind_address(), e))?;
    info!("Server listening on {}", app_config.bind_address());

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
