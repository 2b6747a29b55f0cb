//! # paddock-auth
//!
//! Auth gate implementations and the checkout lifetime policy.
//!
//! Token issuance and storage belong to an external path; this crate only
//! verifies presented tokens and decides whether a checkout gets an
//! extended lifetime.

pub mod gate;
pub mod lifetime;

pub use gate::{StaticTokenGate, StoreTokenGate};
pub use lifetime::{LifetimeDecision, LifetimePolicy};
