//! Auth gate trait for caller token verification.

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for verifying caller-presented auth tokens.
///
/// The gate neither issues nor mutates tokens; it answers whether a token
/// is currently valid and, if so, which user it belongs to. It is consulted
/// only when the auth subsystem is enabled and the caller actually
/// presented a token.
#[async_trait]
pub trait AuthGate: Send + Sync + 'static {
    /// Verify a presented token.
    ///
    /// Returns `Some(user)` for a valid token, `None` otherwise.
    async fn verify(&self, token: &str) -> AppResult<Option<String>>;
}
