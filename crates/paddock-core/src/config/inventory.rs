//! Inventory store configuration.

use serde::{Deserialize, Serialize};

/// Top-level inventory store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Store provider type: `"memory"` or `"redis"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Redis-specific store configuration.
    #[serde(default)]
    pub redis: RedisInventoryConfig,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            redis: RedisInventoryConfig::default(),
        }
    }
}

/// Redis inventory backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisInventoryConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Key prefix for all Paddock inventory keys.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisInventoryConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_provider() -> String {
    "redis".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_key_prefix() -> String {
    "paddock:".to_string()
}
