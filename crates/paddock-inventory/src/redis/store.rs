//! Redis inventory store implementation.
//!
//! Key layout (all under the configured prefix):
//! - `ready:{pool}` — set of ready machine hostnames
//! - `running:{pool}` — set of checked-out machine hostnames
//! - `vm:{hostname}` — hash of machine attributes
//! - `token:{token}` — hash of token attributes, written by the issuance path

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use paddock_core::error::{AppError, ErrorKind};
use paddock_core::result::AppResult;
use paddock_core::traits::inventory::InventoryStore;

use super::client::RedisClient;

/// Redis-backed inventory store.
///
/// `pop_ready` maps to `SPOP`, whose single-key atomicity is the only
/// synchronization the checkout engine depends on.
#[derive(Debug, Clone)]
pub struct RedisInventoryStore {
    /// Redis client.
    client: RedisClient,
}

impl RedisInventoryStore {
    /// Create a new Redis inventory store.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn ready_key(&self, pool: &str) -> String {
        self.client.prefixed_key(&format!("ready:{pool}"))
    }

    fn running_key(&self, pool: &str) -> String {
        self.client.prefixed_key(&format!("running:{pool}"))
    }

    fn vm_key(&self, hostname: &str) -> String {
        self.client.prefixed_key(&format!("vm:{hostname}"))
    }

    fn token_key(&self, token: &str) -> String {
        self.client.prefixed_key(&format!("token:{token}"))
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Store, format!("Redis error: {e}"), e)
    }
}

#[async_trait]
impl InventoryStore for RedisInventoryStore {
    async fn pop_ready(&self, pool: &str) -> AppResult<Option<String>> {
        let key = self.ready_key(pool);
        let mut conn = self.client.conn_mut();
        let popped: Option<String> = conn.spop(&key).await.map_err(Self::map_err)?;
        if let Some(hostname) = &popped {
            debug!(pool, hostname, "Popped machine from ready set");
        }
        Ok(popped)
    }

    async fn add_ready(&self, pool: &str, hostname: &str) -> AppResult<()> {
        let key = self.ready_key(pool);
        let mut conn = self.client.conn_mut();
        let _: () = conn.sadd(&key, hostname).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn ready_count(&self, pool: &str) -> AppResult<u64> {
        let key = self.ready_key(pool);
        let mut conn = self.client.conn_mut();
        let count: u64 = conn.scard(&key).await.map_err(Self::map_err)?;
        Ok(count)
    }

    async fn add_running(&self, pool: &str, hostname: &str) -> AppResult<()> {
        let key = self.running_key(pool);
        let mut conn = self.client.conn_mut();
        let _: () = conn.sadd(&key, hostname).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn remove_running(&self, pool: &str, hostname: &str) -> AppResult<()> {
        let key = self.running_key(pool);
        let mut conn = self.client.conn_mut();
        let _: () = conn.srem(&key, hostname).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn set_machine_field(&self, hostname: &str, field: &str, value: &str) -> AppResult<()> {
        let key = self.vm_key(hostname);
        let mut conn = self.client.conn_mut();
        let _: () = conn.hset(&key, field, value).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn clear_machine_field(&self, hostname: &str, field: &str) -> AppResult<()> {
        let key = self.vm_key(hostname);
        let mut conn = self.client.conn_mut();
        let _: () = conn.hdel(&key, field).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn machine_field(&self, hostname: &str, field: &str) -> AppResult<Option<String>> {
        let key = self.vm_key(hostname);
        let mut conn = self.client.conn_mut();
        let value: Option<String> = conn.hget(&key, field).await.map_err(Self::map_err)?;
        Ok(value)
    }

    async fn token_field(&self, token: &str, field: &str) -> AppResult<Option<String>> {
        let key = self.token_key(token);
        let mut conn = self.client.conn_mut();
        let value: Option<String> = conn.hget(&key, field).await.map_err(Self::map_err)?;
        Ok(value)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}
