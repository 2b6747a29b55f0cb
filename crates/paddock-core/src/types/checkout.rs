//! Checkout request plans and outcomes.

use serde::{Deserialize, Serialize};

/// One validated entry of a checkout request.
///
/// `token` is whatever the caller wrote (pool name or alias); `pool` is the
/// canonical pool it resolved to. The original token is carried through so
/// the response can be keyed by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    /// The caller-supplied pool token.
    pub token: String,
    /// Canonical pool name the token resolved to.
    pub pool: String,
    /// Number of machines requested from this pool.
    pub count: u32,
}

/// A fully validated, alias-resolved checkout request, in caller order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutPlan {
    /// Planned allocations, one per requested pool token.
    pub entries: Vec<PlanEntry>,
}

impl CheckoutPlan {
    /// Total number of machines the plan asks for.
    pub fn total_count(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.count)).sum()
    }
}

/// Machines allocated for one requested pool token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// The caller-supplied pool token.
    pub token: String,
    /// Canonical pool the machines came from.
    pub pool: String,
    /// Allocated machine identifiers.
    pub hostnames: Vec<String>,
}

/// Result of a fully committed checkout, in caller order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutOutcome {
    /// One allocation per requested pool token.
    pub allocations: Vec<Allocation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_count_sums_entries() {
        let plan = CheckoutPlan {
            entries: vec![
                PlanEntry {
                    token: "poolone".to_string(),
                    pool: "pool1".to_string(),
                    count: 1,
                },
                PlanEntry {
                    token: "pool2".to_string(),
                    pool: "pool2".to_string(),
                    count: 3,
                },
            ],
        };
        assert_eq!(plan.total_count(), 4);
    }
}
