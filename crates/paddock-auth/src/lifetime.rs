//! Checkout lifetime policy.
//!
//! Decision table:
//!
//! | Auth subsystem | Token presented and valid | Lifetime          |
//! |----------------|---------------------------|-------------------|
//! | disabled       | (ignored)                 | not stamped       |
//! | enabled        | no                        | not stamped       |
//! | enabled        | yes                       | configured hours  |
//!
//! The gate is consulted only on the enabled row, and only when the caller
//! actually presented a token.

use std::sync::Arc;

use tracing::debug;

use paddock_core::config::auth::{AuthConfig, AuthMode};
use paddock_core::result::AppResult;
use paddock_core::traits::auth_gate::AuthGate;

/// Outcome of the lifetime policy for one checkout request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifetimeDecision {
    /// Leave the lifetime attribute unset; the provisioning-time default
    /// applies.
    NoStamp,
    /// Stamp every machine in the request with the given lifetime.
    Stamp {
        /// Lifetime in hours.
        hours: u32,
        /// The token that authenticated the request.
        token: String,
        /// User the token belongs to.
        user: String,
    },
}

impl LifetimeDecision {
    /// Whether this decision stamps a lifetime.
    pub fn is_stamp(&self) -> bool {
        matches!(self, Self::Stamp { .. })
    }
}

/// Decides the lifetime stamped on machines at checkout time.
///
/// Evaluated once per request, not per machine.
#[derive(Clone)]
pub struct LifetimePolicy {
    /// Whether auth is enabled.
    mode: AuthMode,
    /// Hours granted to authenticated checkouts.
    token_lifetime_hours: u32,
    /// Gate used to verify presented tokens.
    gate: Arc<dyn AuthGate>,
}

impl LifetimePolicy {
    /// Create a policy from configuration and a gate.
    pub fn new(config: &AuthConfig, gate: Arc<dyn AuthGate>) -> Self {
        Self {
            mode: config.mode,
            token_lifetime_hours: config.token_lifetime_hours,
            gate,
        }
    }

    /// Evaluate the decision table for one request.
    ///
    /// `presented` is the raw value of the auth token header, if any.
    pub async fn evaluate(&self, presented: Option<&str>) -> AppResult<LifetimeDecision> {
        if self.mode == AuthMode::Disabled {
            return Ok(LifetimeDecision::NoStamp);
        }

        let Some(token) = presented else {
            return Ok(LifetimeDecision::NoStamp);
        };

        match self.gate.verify(token).await? {
            Some(user) => {
                debug!(user = %user, hours = self.token_lifetime_hours, "Authenticated checkout");
                Ok(LifetimeDecision::Stamp {
                    hours: self.token_lifetime_hours,
                    token: token.to_string(),
                    user,
                })
            }
            None => Ok(LifetimeDecision::NoStamp),
        }
    }
}
