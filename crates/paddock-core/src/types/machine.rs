//! Machine states and attribute record field names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a machine as far as the checkout path is concerned.
///
/// The provisioning and reclamation backends use further states; the
/// checkout engine only ever performs the ready → running transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineState {
    /// Provisioned and available for checkout.
    Ready,
    /// Checked out to a caller.
    Running,
}

impl MachineState {
    /// Stable string form stored in the machine record.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Running => "running",
        }
    }
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field names of the per-machine attribute record.
pub mod fields {
    /// Pool the machine belongs to.
    pub const POOL: &str = "pool";
    /// Current [`MachineState`](super::MachineState).
    pub const STATE: &str = "state";
    /// Checkout timestamp, RFC 3339.
    pub const CHECKOUT: &str = "checkout";
    /// Lifetime in hours, present only when stamped at checkout.
    pub const LIFETIME: &str = "lifetime";
    /// Token that authenticated the checkout, when one did.
    pub const TOKEN: &str = "token";
    /// User the authenticating token belongs to.
    pub const TOKEN_USER: &str = "token_user";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_string_form() {
        assert_eq!(MachineState::Ready.as_str(), "ready");
        assert_eq!(MachineState::Running.to_string(), "running");
    }

    #[test]
    fn test_state_serde_lowercase() {
        let json = serde_json::to_string(&MachineState::Running).expect("serialize");
        assert_eq!(json, "\"running\"");
    }
}
