//! Auth gate implementations.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tracing::debug;

use paddock_core::result::AppResult;
use paddock_core::traits::auth_gate::AuthGate;
use paddock_core::traits::inventory::InventoryStore;

/// Auth gate backed by token records in the inventory store.
///
/// A token is valid when a record for it exists; the record's `user` field
/// identifies the owner. Records are written by the external issuance path
/// and never mutated here.
#[derive(Clone)]
pub struct StoreTokenGate {
    /// Store holding token records.
    store: Arc<dyn InventoryStore>,
}

impl StoreTokenGate {
    /// Create a gate over the given store.
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthGate for StoreTokenGate {
    async fn verify(&self, token: &str) -> AppResult<Option<String>> {
        let user = self.store.token_field(token, "user").await?;
        debug!(valid = user.is_some(), "Verified auth token");
        Ok(user)
    }
}

/// Fixed-table auth gate for tests.
///
/// Records how many times it was consulted so tests can assert the gate is
/// skipped when auth is disabled.
#[derive(Debug, Default)]
pub struct StaticTokenGate {
    /// Valid token → user.
    tokens: HashMap<String, String>,
    /// Number of `verify` calls observed.
    calls: AtomicUsize,
}

impl StaticTokenGate {
    /// Create a gate that accepts the given (token, user) pairs.
    pub fn new(tokens: &[(&str, &str)]) -> Self {
        Self {
            tokens: tokens
                .iter()
                .map(|(t, u)| ((*t).to_string(), (*u).to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `verify` has been called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthGate for StaticTokenGate {
    async fn verify(&self, token: &str) -> AppResult<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.tokens.get(token).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paddock_inventory::memory::MemoryInventoryStore;

    #[tokio::test]
    async fn test_store_gate_accepts_known_token() {
        let store = MemoryInventoryStore::new();
        store.insert_token("abcdef0123456789", "jdoe").await;
        let gate = StoreTokenGate::new(Arc::new(store));

        let user = gate.verify("abcdef0123456789").await.expect("verify");
        assert_eq!(user.as_deref(), Some("jdoe"));
    }

    #[tokio::test]
    async fn test_store_gate_rejects_unknown_token() {
        let store = MemoryInventoryStore::new();
        let gate = StoreTokenGate::new(Arc::new(store));

        let user = gate.verify("nope").await.expect("verify");
        assert_eq!(user, None);
    }

    #[tokio::test]
    async fn test_static_gate_counts_calls() {
        let gate = StaticTokenGate::new(&[("tok", "jdoe")]);
        assert_eq!(gate.call_count(), 0);
        let _ = gate.verify("tok").await.expect("verify");
        let _ = gate.verify("other").await.expect("verify");
        assert_eq!(gate.call_count(), 2);
    }
}
