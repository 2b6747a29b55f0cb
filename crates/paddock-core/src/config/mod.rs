//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod auth;
pub mod inventory;
pub mod logging;
pub mod pools;
pub mod server;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use self::auth::AuthConfig;
use self::inventory::InventoryConfig;
use self::logging::LoggingConfig;
use self::pools::PoolDefinition;
use self::server::ServerConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay). It is
/// constructed once at process start and passed explicitly into the
/// checkout engine; nothing reads it as ambient global state.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Inventory store settings.
    #[serde(default)]
    pub inventory: InventoryConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Configured machine pools.
    #[serde(default)]
    pub pools: Vec<PoolDefinition>,
    /// Alias name → canonical pool name. Single hop; aliases never chain.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `PADDOCK_`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("PADDOCK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field consistency of the pool catalog.
    ///
    /// Pool names must be unique and non-empty, alias names must not
    /// collide with pool names, and every alias target must name a
    /// configured pool.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut names = std::collections::HashSet::new();
        for pool in &self.pools {
            if pool.name.is_empty() {
                return Err(AppError::configuration("Pool with empty name"));
            }
            if !names.insert(pool.name.as_str()) {
                return Err(AppError::configuration(format!(
                    "Duplicate pool name: '{}'",
                    pool.name
                )));
            }
        }

        for (alias, target) in &self.aliases {
            if alias.is_empty() {
                return Err(AppError::configuration("Alias with empty name"));
            }
            if names.contains(alias.as_str()) {
                return Err(AppError::configuration(format!(
                    "Alias '{alias}' collides with a pool name"
                )));
            }
            if !names.contains(target.as_str()) {
                return Err(AppError::configuration(format!(
                    "Alias '{alias}' targets unknown pool '{target}'"
                )));
            }
        }

        Ok(())
    }
}
