//! Inventory store trait for machine pool state.

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for the durable store holding per-pool ready sets and per-machine
/// attribute records.
///
/// The engine relies on exactly one synchronization primitive:
/// [`pop_ready`](InventoryStore::pop_ready) must atomically remove and
/// return one arbitrary member, so two concurrent checkouts can never both
/// receive the same machine. Implementations provide no other locking and
/// the engine holds no request-level locks of its own. Two implementations
/// are provided:
/// - Redis-based (`SPOP` against the ready set)
/// - In-memory (using `tokio::sync::Mutex`)
#[async_trait]
pub trait InventoryStore: Send + Sync + 'static {
    /// Atomically remove and return one machine from a pool's ready set.
    ///
    /// Returns `None` when the ready set is empty.
    async fn pop_ready(&self, pool: &str) -> AppResult<Option<String>>;

    /// Add a machine to a pool's ready set.
    ///
    /// Used by the rollback path to return popped machines, and by
    /// provisioning-side tooling to seed inventory.
    async fn add_ready(&self, pool: &str, hostname: &str) -> AppResult<()>;

    /// Number of machines currently in a pool's ready set.
    async fn ready_count(&self, pool: &str) -> AppResult<u64>;

    /// Add a machine to a pool's running set.
    async fn add_running(&self, pool: &str, hostname: &str) -> AppResult<()>;

    /// Remove a machine from a pool's running set.
    ///
    /// Used by the rollback path when a commit fails partway through.
    async fn remove_running(&self, pool: &str, hostname: &str) -> AppResult<()>;

    /// Set one field of a machine's attribute record.
    async fn set_machine_field(&self, hostname: &str, field: &str, value: &str) -> AppResult<()>;

    /// Remove one field of a machine's attribute record.
    async fn clear_machine_field(&self, hostname: &str, field: &str) -> AppResult<()>;

    /// Read one field of a machine's attribute record.
    async fn machine_field(&self, hostname: &str, field: &str) -> AppResult<Option<String>>;

    /// Read one field of a stored token record.
    ///
    /// Token records are written by the (external) issuance path; the
    /// checkout engine only ever reads them.
    async fn token_field(&self, token: &str, field: &str) -> AppResult<Option<String>>;

    /// Check that the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
