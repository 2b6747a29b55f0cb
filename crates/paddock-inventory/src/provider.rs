//! Inventory manager that dispatches to the configured provider.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use paddock_core::config::inventory::InventoryConfig;
use paddock_core::error::AppError;
use paddock_core::result::AppResult;
use paddock_core::traits::inventory::InventoryStore;

/// Inventory manager that wraps the configured store provider.
///
/// The provider is selected at construction time based on configuration.
#[derive(Clone)]
pub struct InventoryManager {
    /// The inner inventory store.
    inner: Arc<dyn InventoryStore>,
}

impl InventoryManager {
    /// Create a new inventory manager from configuration.
    pub async fn new(config: &InventoryConfig) -> AppResult<Self> {
        let inner: Arc<dyn InventoryStore> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis inventory store");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisInventoryStore::new(client))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory inventory store");
                Arc::new(crate::memory::MemoryInventoryStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown inventory provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Get a shared handle to the inner store.
    pub fn store(&self) -> Arc<dyn InventoryStore> {
        self.inner.clone()
    }
}

#[async_trait]
impl InventoryStore for InventoryManager {
    async fn pop_ready(&self, pool: &str) -> AppResult<Option<String>> {
        self.inner.pop_ready(pool).await
    }

    async fn add_ready(&self, pool: &str, hostname: &str) -> AppResult<()> {
        self.inner.add_ready(pool, hostname).await
    }

    async fn ready_count(&self, pool: &str) -> AppResult<u64> {
        self.inner.ready_count(pool).await
    }

    async fn add_running(&self, pool: &str, hostname: &str) -> AppResult<()> {
        self.inner.add_running(pool, hostname).await
    }

    async fn remove_running(&self, pool: &str, hostname: &str) -> AppResult<()> {
        self.inner.remove_running(pool, hostname).await
    }

    async fn set_machine_field(&self, hostname: &str, field: &str, value: &str) -> AppResult<()> {
        self.inner.set_machine_field(hostname, field, value).await
    }

    async fn clear_machine_field(&self, hostname: &str, field: &str) -> AppResult<()> {
        self.inner.clear_machine_field(hostname, field).await
    }

    async fn machine_field(&self, hostname: &str, field: &str) -> AppResult<Option<String>> {
        self.inner.machine_field(hostname, field).await
    }

    async fn token_field(&self, token: &str, field: &str) -> AppResult<Option<String>> {
        self.inner.token_field(token, field).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
