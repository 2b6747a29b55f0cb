//! In-memory inventory store using a Tokio mutex for single-node use.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use paddock_core::result::AppResult;
use paddock_core::traits::inventory::InventoryStore;

/// Internal state for the memory-based inventory store.
#[derive(Debug, Default)]
struct InnerState {
    /// Ready sets, keyed by pool name.
    ready: HashMap<String, HashSet<String>>,
    /// Running sets, keyed by pool name.
    running: HashMap<String, HashSet<String>>,
    /// Machine attribute records, keyed by hostname.
    machines: HashMap<String, HashMap<String, String>>,
    /// Token records, keyed by token value.
    tokens: HashMap<String, HashMap<String, String>>,
}

/// In-memory inventory store using a Tokio mutex for thread safety.
///
/// Removing a member under the lock gives the same exactly-one-winner
/// guarantee `SPOP` gives. Suitable for single-node deployments and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryInventoryStore {
    /// Protected inner state.
    state: Arc<Mutex<InnerState>>,
}

impl MemoryInventoryStore {
    /// Creates a new empty memory-based inventory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a token record, standing in for the external issuance path.
    pub async fn insert_token(&self, token: &str, user: &str) {
        let mut state = self.state.lock().await;
        state
            .tokens
            .entry(token.to_string())
            .or_default()
            .insert("user".to_string(), user.to_string());
    }

    /// Number of machines currently in a pool's running set.
    pub async fn running_count(&self, pool: &str) -> u64 {
        let state = self.state.lock().await;
        state.running.get(pool).map_or(0, |s| s.len() as u64)
    }
}

#[async_trait]
impl InventoryStore for MemoryInventoryStore {
    async fn pop_ready(&self, pool: &str) -> AppResult<Option<String>> {
        let mut state = self.state.lock().await;

        let Some(set) = state.ready.get_mut(pool) else {
            return Ok(None);
        };
        let Some(hostname) = set.iter().next().cloned() else {
            return Ok(None);
        };
        set.remove(&hostname);
        debug!(pool, hostname = %hostname, "Popped machine from ready set");
        Ok(Some(hostname))
    }

    async fn add_ready(&self, pool: &str, hostname: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state
            .ready
            .entry(pool.to_string())
            .or_default()
            .insert(hostname.to_string());
        Ok(())
    }

    async fn ready_count(&self, pool: &str) -> AppResult<u64> {
        let state = self.state.lock().await;
        Ok(state.ready.get(pool).map_or(0, |s| s.len() as u64))
    }

    async fn add_running(&self, pool: &str, hostname: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state
            .running
            .entry(pool.to_string())
            .or_default()
            .insert(hostname.to_string());
        Ok(())
    }

    async fn remove_running(&self, pool: &str, hostname: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(set) = state.running.get_mut(pool) {
            set.remove(hostname);
        }
        Ok(())
    }

    async fn set_machine_field(&self, hostname: &str, field: &str, value: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state
            .machines
            .entry(hostname.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn clear_machine_field(&self, hostname: &str, field: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(record) = state.machines.get_mut(hostname) {
            record.remove(field);
        }
        Ok(())
    }

    async fn machine_field(&self, hostname: &str, field: &str) -> AppResult<Option<String>> {
        let state = self.state.lock().await;
        Ok(state
            .machines
            .get(hostname)
            .and_then(|record| record.get(field))
            .cloned())
    }

    async fn token_field(&self, token: &str, field: &str) -> AppResult<Option<String>> {
        let state = self.state.lock().await;
        Ok(state
            .tokens
            .get(token)
            .and_then(|record| record.get(field))
            .cloned())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pop_ready_removes_member() {
        let store = MemoryInventoryStore::new();
        store.add_ready("pool1", "vm-a").await.expect("add");

        let popped = store.pop_ready("pool1").await.expect("pop");
        assert_eq!(popped.as_deref(), Some("vm-a"));
        assert_eq!(store.ready_count("pool1").await.expect("count"), 0);
    }

    #[tokio::test]
    async fn test_pop_ready_empty_pool() {
        let store = MemoryInventoryStore::new();
        assert_eq!(store.pop_ready("pool1").await.expect("pop"), None);
    }

    #[tokio::test]
    async fn test_machine_fields_roundtrip() {
        let store = MemoryInventoryStore::new();
        store
            .set_machine_field("vm-a", "state", "running")
            .await
            .expect("set");

        let state = store.machine_field("vm-a", "state").await.expect("get");
        assert_eq!(state.as_deref(), Some("running"));
        let missing = store.machine_field("vm-a", "lifetime").await.expect("get");
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_concurrent_pops_one_winner_each() {
        let store = MemoryInventoryStore::new();
        for i in 0..8 {
            store
                .add_ready("pool1", &format!("vm-{i}"))
                .await
                .expect("add");
        }

        let pops = (0..8).map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.pop_ready("pool1").await })
        });
        let mut seen = std::collections::HashSet::new();
        for handle in pops {
            let popped = handle.await.expect("join").expect("pop").expect("member");
            assert!(seen.insert(popped), "machine handed out twice");
        }
        assert_eq!(store.ready_count("pool1").await.expect("count"), 0);
    }
}
