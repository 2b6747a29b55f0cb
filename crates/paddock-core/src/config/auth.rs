//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Whether the optional auth subsystem is active.
///
/// Modeled as an enum rather than a bare bool so the lifetime policy can
/// match on it and the gate call stays isolated to one decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// No token verification; checkouts never get an extended lifetime.
    Disabled,
    /// Tokens are verified against stored token records.
    Enabled,
}

impl Default for AuthMode {
    fn default() -> Self {
        Self::Disabled
    }
}

/// Authentication and lifetime-extension configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Whether token verification is enabled.
    #[serde(default)]
    pub mode: AuthMode,
    /// Lifetime in hours stamped on machines checked out with a valid
    /// token. Ignored while auth is disabled.
    #[serde(default = "default_token_lifetime")]
    pub token_lifetime_hours: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            mode: AuthMode::default(),
            token_lifetime_hours: default_token_lifetime(),
        }
    }
}

fn default_token_lifetime() -> u32 {
    12
}
