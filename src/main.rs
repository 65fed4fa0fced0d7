use std::sync::Arc;
use storefront_rust::catalog::Catalog;
use storefront_rust::config::Config;
use storefront_rust::error::StoreResult;
use storefront_rust::router::create_app_router;
use storefront_rust::state::AppState;
use tracing::info;

#[tokio::main]
async fn main() -> StoreResult<()> {
    // Load configuration and initialize logging
    let config = Config::from_env()?;
    config.init_logging()?;

    info!("Starting storefront_rust v{}", env!("CARGO_PKG_VERSION"));

    // Load the catalog
    let catalog = match &config.catalog_path {
        Some(path) => {
            info!("Loading catalog from {}", path.display());
            Catalog::from_file(path)?
        }
        None => Catalog::bundled()?,
    };

    // Initialize application state
    let state = Arc::new(AppState::new(catalog));

    // Build application router with all routes and middleware
    let app = create_app_router(state);

    // Start the server
    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
