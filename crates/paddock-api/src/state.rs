//! Application state shared across all handlers.

use std::sync::Arc;

use paddock_core::config::AppConfig;
use paddock_core::traits::inventory::InventoryStore;
use paddock_engine::catalog::PoolCatalog;
use paddock_engine::checkout::CheckoutEngine;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// cheap to clone; the configuration is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Pool catalog (pools + aliases), read-only per request.
    pub catalog: Arc<PoolCatalog>,
    /// The checkout engine.
    pub engine: CheckoutEngine,
    /// Inventory store handle, used by the health check.
    pub store: Arc<dyn InventoryStore>,
}

impl AppState {
    /// Assemble the state from its already-constructed parts.
    pub fn new(
        config: Arc<AppConfig>,
        catalog: Arc<PoolCatalog>,
        engine: CheckoutEngine,
        store: Arc<dyn InventoryStore>,
    ) -> Self {
        Self {
            config,
            catalog,
            engine,
            store,
        }
    }
}
