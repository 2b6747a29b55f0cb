//! Request and response DTOs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use paddock_core::types::checkout::CheckoutOutcome;

/// Wire shape of a checkout request body: pool token → requested count.
///
/// Counts are JSON strings on the original wire format; numbers are
/// accepted too. The map preserves caller key order so responses can echo
/// it.
pub type CheckoutRequest = Map<String, Value>;

/// Successful checkout response.
///
/// Serializes as `{"ok": true, "<token>": {"hostname": ...}, ...}` with
/// one entry per requested pool token, keyed by the token the caller used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    /// Always `true`.
    pub ok: bool,
    /// Per-token machine assignments.
    #[serde(flatten)]
    pub assignments: Map<String, Value>,
}

impl From<CheckoutOutcome> for CheckoutResponse {
    fn from(outcome: CheckoutOutcome) -> Self {
        let mut assignments = Map::new();
        for allocation in outcome.allocations {
            // A single requested machine yields a bare hostname string,
            // more than one yields an array.
            let hostname: Value = if allocation.hostnames.len() == 1 {
                Value::from(allocation.hostnames.into_iter().next().unwrap_or_default())
            } else {
                Value::from(allocation.hostnames)
            };
            assignments.insert(allocation.token, json!({ "hostname": hostname }));
        }
        Self {
            ok: true,
            assignments,
        }
    }
}

/// Response for pool listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolListResponse {
    /// Always `true`.
    pub ok: bool,
    /// Sorted canonical pool names.
    pub pools: Vec<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `true` when the process is serving.
    pub ok: bool,
    /// Service version.
    pub version: String,
    /// Whether the inventory store answered a ping.
    pub store: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use paddock_core::types::checkout::Allocation;

    #[test]
    fn test_single_machine_serializes_bare_hostname() {
        let outcome = CheckoutOutcome {
            allocations: vec![Allocation {
                token: "pool1".to_string(),
                pool: "pool1".to_string(),
                hostnames: vec!["abcdefghijklmnop".to_string()],
            }],
        };

        let body = serde_json::to_value(CheckoutResponse::from(outcome)).expect("serialize");
        assert_eq!(
            body,
            json!({"ok": true, "pool1": {"hostname": "abcdefghijklmnop"}})
        );
    }

    #[test]
    fn test_multiple_machines_serialize_as_array() {
        let outcome = CheckoutOutcome {
            allocations: vec![Allocation {
                token: "poolone".to_string(),
                pool: "pool1".to_string(),
                hostnames: vec!["vm-a".to_string(), "vm-b".to_string()],
            }],
        };

        let body = serde_json::to_value(CheckoutResponse::from(outcome)).expect("serialize");
        assert_eq!(
            body,
            json!({"ok": true, "poolone": {"hostname": ["vm-a", "vm-b"]}})
        );
    }
}
