use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelscout_core::{
    create_row_store, load_config, validate_config, MovieCatalog, SearchCoordinator, TmdbClient,
    TrendStore,
};
use reelscout_server::{api::create_router, state::AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("REELSCOUT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Trend store backend: {:?}", config.trend_store.backend);

    // Movie catalog
    let tmdb = TmdbClient::new(config.catalog.clone()).context("Failed to create TMDB client")?;
    let image_base_url = tmdb.image_base_url().to_string();
    let catalog: Arc<dyn MovieCatalog> = Arc::new(tmdb);
    info!("TMDB client initialized");

    // Trend store
    let row_store =
        create_row_store(&config.trend_store).context("Failed to create trend row store")?;
    info!("Using row store: {}", row_store.backend_name());

    let trends = TrendStore::new(
        row_store,
        config.trend_store.database_id.clone(),
        config.trend_store.table_id.clone(),
        image_base_url,
    )
    .with_limit(config.trend_store.trending_limit);

    // Search coordinator
    let coordinator = SearchCoordinator::new(catalog, Arc::new(trends), config.search.clone());
    coordinator.start_debouncing();

    let state = Arc::new(AppState::new(config.clone(), coordinator.clone()));
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Initial discover fetch and trending load run behind the listener
    let loader = coordinator.clone();
    tokio::spawn(async move {
        loader.load_initial().await;
        info!("Initial movie and trending load finished");
    });

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    coordinator.stop();

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
