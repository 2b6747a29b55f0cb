//! Pool catalog and alias resolution.

use std::collections::HashMap;

use paddock_core::config::AppConfig;
use paddock_core::config::pools::PoolDefinition;

/// Read-only catalog of configured pools and their aliases.
///
/// Built once from configuration at process start; consulted on every
/// request without mutation.
#[derive(Debug, Clone, Default)]
pub struct PoolCatalog {
    /// Canonical pool name → definition.
    pools: HashMap<String, PoolDefinition>,
    /// Alias name → canonical pool name. Single hop.
    aliases: HashMap<String, String>,
}

impl PoolCatalog {
    /// Build a catalog from validated configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            pools: config
                .pools
                .iter()
                .map(|p| (p.name.clone(), p.clone()))
                .collect(),
            aliases: config.aliases.clone(),
        }
    }

    /// Resolve a caller-supplied pool token to a canonical pool name.
    ///
    /// Canonical names win over aliases; matching is exact and
    /// case-sensitive. Returns `None` for tokens matching neither.
    pub fn resolve(&self, token: &str) -> Option<&str> {
        if let Some((name, _)) = self.pools.get_key_value(token) {
            return Some(name.as_str());
        }
        self.aliases.get(token).map(String::as_str)
    }

    /// Look up a pool definition by canonical name.
    pub fn pool(&self, name: &str) -> Option<&PoolDefinition> {
        self.pools.get(name)
    }

    /// Sorted list of canonical pool names.
    pub fn pool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.pools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of configured pools.
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Whether no pools are configured.
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}
