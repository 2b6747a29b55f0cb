//! The two-phase checkout engine.
//!
//! Phase 1 reserves machines by atomically popping them from each
//! requested pool's ready set. Phase 2 either commits every reserved
//! machine (running set, state, checkout timestamp, lifetime stamp) or
//! pushes every one of them back into its ready set. Only the store's
//! atomic pop is relied on for synchronization; no request-level locks
//! are held.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tracing::{error, info, warn};

use paddock_auth::lifetime::{LifetimeDecision, LifetimePolicy};
use paddock_core::error::AppError;
use paddock_core::result::AppResult;
use paddock_core::traits::inventory::InventoryStore;
use paddock_core::types::checkout::{Allocation, CheckoutOutcome, CheckoutPlan};
use paddock_core::types::machine::{MachineState, fields};

/// Machines popped for one plan entry during phase 1.
#[derive(Debug)]
struct Reservation {
    /// Caller-supplied pool token.
    token: String,
    /// Canonical pool name.
    pool: String,
    /// Machines popped so far (may be short of the requested count).
    hostnames: Vec<String>,
    /// `None` when the requested count was fully popped.
    failure: Option<AppError>,
}

/// Allocates machines from ready inventory with all-or-nothing semantics.
///
/// Constructed once at startup from the immutable configuration and shared
/// across requests.
#[derive(Clone)]
pub struct CheckoutEngine {
    /// Inventory store handle.
    store: Arc<dyn InventoryStore>,
    /// Lifetime policy, evaluated once per request.
    policy: LifetimePolicy,
}

impl CheckoutEngine {
    /// Create an engine over the given store and lifetime policy.
    pub fn new(store: Arc<dyn InventoryStore>, policy: LifetimePolicy) -> Self {
        Self { store, policy }
    }

    /// Execute a validated checkout plan.
    ///
    /// `presented_token` is the caller's auth token header, if any. On any
    /// shortfall or store failure every popped machine is returned to its
    /// ready set and the whole request fails; no machine is ever left
    /// popped but unassigned.
    pub async fn checkout(
        &self,
        plan: &CheckoutPlan,
        presented_token: Option<&str>,
    ) -> AppResult<CheckoutOutcome> {
        // Phase 1: reserve. Pools touch disjoint keys, so they can be
        // popped concurrently; pops within one pool run in sequence.
        let reservations = join_all(
            plan.entries
                .iter()
                .map(|entry| self.reserve(&entry.token, &entry.pool, entry.count)),
        )
        .await;

        if let Some(failed) = reservations.iter().find_map(|r| r.failure.as_ref()) {
            let failed = failed.clone();
            self.rollback(&reservations).await;
            return Err(failed);
        }

        // The policy runs before any commit write so a gate failure still
        // takes the plain rollback path.
        let decision = match self.policy.evaluate(presented_token).await {
            Ok(decision) => decision,
            Err(e) => {
                self.rollback(&reservations).await;
                return Err(e);
            }
        };

        // Phase 2: commit.
        if let Err(e) = self.commit(&reservations, &decision).await {
            self.rollback(&reservations).await;
            return Err(e);
        }

        info!(
            pools = plan.entries.len(),
            machines = plan.total_count(),
            stamped = decision.is_stamp(),
            "Checkout committed"
        );

        Ok(CheckoutOutcome {
            allocations: reservations
                .into_iter()
                .map(|r| Allocation {
                    token: r.token,
                    pool: r.pool,
                    hostnames: r.hostnames,
                })
                .collect(),
        })
    }

    /// Pop `count` machines from one pool's ready set.
    async fn reserve(&self, token: &str, pool: &str, count: u32) -> Reservation {
        let mut reservation = Reservation {
            token: token.to_string(),
            pool: pool.to_string(),
            hostnames: Vec::with_capacity(count as usize),
            failure: None,
        };

        for _ in 0..count {
            match self.store.pop_ready(pool).await {
                Ok(Some(hostname)) => reservation.hostnames.push(hostname),
                Ok(None) => {
                    reservation.failure = Some(AppError::insufficient(format!(
                        "Pool '{pool}' has fewer than {count} ready machines"
                    )));
                    break;
                }
                Err(e) => {
                    reservation.failure = Some(e);
                    break;
                }
            }
        }

        reservation
    }

    /// Write the running-state transition and lifetime stamp for every
    /// reserved machine.
    async fn commit(
        &self,
        reservations: &[Reservation],
        decision: &LifetimeDecision,
    ) -> AppResult<()> {
        let now = Utc::now().to_rfc3339();

        for reservation in reservations {
            for hostname in &reservation.hostnames {
                self.store.add_running(&reservation.pool, hostname).await?;
                self.store
                    .set_machine_field(hostname, fields::STATE, MachineState::Running.as_str())
                    .await?;
                self.store
                    .set_machine_field(hostname, fields::CHECKOUT, &now)
                    .await?;

                if let LifetimeDecision::Stamp { hours, token, user } = decision {
                    self.store
                        .set_machine_field(hostname, fields::LIFETIME, &hours.to_string())
                        .await?;
                    self.store
                        .set_machine_field(hostname, fields::TOKEN, token)
                        .await?;
                    self.store
                        .set_machine_field(hostname, fields::TOKEN_USER, user)
                        .await?;
                }
            }
        }

        Ok(())
    }

    /// Return every popped machine to its ready set and undo any partial
    /// commit writes.
    ///
    /// Best effort: a store that fails here cannot be repaired locally, so
    /// failures are logged and the original error is surfaced to the
    /// caller unchanged.
    async fn rollback(&self, reservations: &[Reservation]) {
        for reservation in reservations {
            for hostname in &reservation.hostnames {
                warn!(
                    pool = %reservation.pool,
                    hostname = %hostname,
                    "Rolling back popped machine"
                );

                if let Err(e) = self.store.remove_running(&reservation.pool, hostname).await {
                    error!(hostname = %hostname, error = %e, "Rollback: failed to remove from running set");
                }
                for field in [
                    fields::CHECKOUT,
                    fields::LIFETIME,
                    fields::TOKEN,
                    fields::TOKEN_USER,
                ] {
                    if let Err(e) = self.store.clear_machine_field(hostname, field).await {
                        error!(hostname = %hostname, field, error = %e, "Rollback: failed to clear field");
                    }
                }
                if let Err(e) = self
                    .store
                    .set_machine_field(hostname, fields::STATE, MachineState::Ready.as_str())
                    .await
                {
                    error!(hostname = %hostname, error = %e, "Rollback: failed to reset state");
                }
                if let Err(e) = self.store.add_ready(&reservation.pool, hostname).await {
                    error!(hostname = %hostname, error = %e, "Rollback: failed to re-add to ready set");
                }
            }
        }
    }
}
