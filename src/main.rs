//! Paddock Server — VM pool checkout service
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use paddock_auth::gate::StoreTokenGate;
use paddock_auth::lifetime::LifetimePolicy;
use paddock_core::config::AppConfig;
use paddock_core::error::AppError;
use paddock_engine::catalog::PoolCatalog;
use paddock_engine::checkout::CheckoutEngine;
use paddock_inventory::provider::InventoryManager;

#[tokio::main]
async fn main() {
    let env = std::env::var("PADDOCK_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Paddock v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Inventory store ──────────────────────────────────
    tracing::info!(
        "Initializing inventory store (provider: {})...",
        config.inventory.provider
    );
    let inventory = InventoryManager::new(&config.inventory).await?;
    let store = inventory.store();
    tracing::info!("Inventory store initialized");

    // ── Step 2: Pool catalog ─────────────────────────────────────
    let catalog = Arc::new(PoolCatalog::from_config(&config));
    tracing::info!(
        pools = catalog.len(),
        aliases = config.aliases.len(),
        "Pool catalog loaded"
    );

    // ── Step 3: Auth gate + lifetime policy ──────────────────────
    let gate = Arc::new(StoreTokenGate::new(store.clone()));
    let policy = LifetimePolicy::new(&config.auth, gate);
    tracing::info!(mode = ?config.auth.mode, "Auth configured");

    // ── Step 4: Checkout engine ──────────────────────────────────
    let engine = CheckoutEngine::new(store.clone(), policy);

    // ── Step 5: Build and start HTTP server ──────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = paddock_api::state::AppState::new(Arc::new(config), catalog, engine, store);
    let app = paddock_api::router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Paddock server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("Paddock server stopped");
    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
