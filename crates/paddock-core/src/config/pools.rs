//! Pool catalog configuration.

use serde::{Deserialize, Serialize};

/// A single configured machine pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolDefinition {
    /// Unique pool name, used as the canonical request token.
    pub name: String,
    /// Target number of ready machines the replenisher maintains.
    #[serde(default)]
    pub size: u32,
}
